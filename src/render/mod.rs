/*!
 * Render Module
 * HTML for public pages and dashboard screens
 */
pub mod dashboard;
pub mod html;
pub mod public;

pub mod dialog;
pub mod editor;
pub mod find_dialog;
pub mod font_dialog;
pub mod help;
pub mod menu_bar;
pub mod status_bar;
pub mod toolbar;

pub mod about_panel;
pub mod locate_control;
pub mod map_view;
pub mod sidebar;
pub mod station_detail;
pub mod type_filter;

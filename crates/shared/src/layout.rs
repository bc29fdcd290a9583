//! Responsive presentation of the sidebar and map controls as a pure
//! function of viewport width and sidebar state.

/// Viewports narrower than this get the bottom-sheet layout.
pub const MOBILE_BREAKPOINT_PX: f64 = 640.0;

/// Share of the bottom sheet's height the map moves up by.
pub const SHEET_MAP_SHIFT_RATIO: f64 = 0.7;

/// Duration of the sheet and map transitions.
pub const SHEET_TRANSITION_MS: u32 = 300;

const CONTROLS_TOP_PX: f64 = 10.0;
const CONTROLS_BOTTOM_PX: f64 = 70.0;

pub fn is_mobile(width: f64) -> bool {
    width < MOBILE_BREAKPOINT_PX
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SidebarState {
    #[default]
    Closed,
    /// Mobile sheet sliding out; becomes `Closed` after the transition.
    Closing,
    Open,
    /// Mobile sheet lowered via its handle, detail still loaded.
    Collapsed,
}

impl SidebarState {
    pub fn is_open(self) -> bool {
        matches!(self, SidebarState::Open | SidebarState::Collapsed)
    }

    pub fn close(self, width: f64) -> Self {
        if is_mobile(width) && self.is_open() {
            SidebarState::Closing
        } else {
            SidebarState::Closed
        }
    }

    pub fn finish_closing(self) -> Self {
        match self {
            SidebarState::Closing => SidebarState::Closed,
            other => other,
        }
    }

    /// Sheet handle click. Only meaningful for the bottom sheet.
    pub fn toggle_sheet(self, width: f64) -> Self {
        if !is_mobile(width) {
            return self;
        }
        match self {
            SidebarState::Open => SidebarState::Collapsed,
            SidebarState::Collapsed => SidebarState::Open,
            other => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SidebarClasses {
    pub hidden: bool,
    pub absolute: bool,
    pub bottom_sheet: bool,
    pub active: bool,
}

impl SidebarClasses {
    pub fn class_list(&self) -> String {
        [
            (self.hidden, "hidden"),
            (self.absolute, "absolute"),
            (self.bottom_sheet, "bottom-sheet"),
            (self.active, "active"),
        ]
        .iter()
        .filter(|(on, _)| *on)
        .map(|(_, name)| *name)
        .collect::<Vec<_>>()
        .join(" ")
    }
}

pub fn sidebar_classes(width: f64, state: SidebarState) -> SidebarClasses {
    let mobile = is_mobile(width);
    match state {
        SidebarState::Closed => SidebarClasses {
            hidden: true,
            ..Default::default()
        },
        SidebarState::Closing if mobile => SidebarClasses {
            bottom_sheet: true,
            ..Default::default()
        },
        SidebarState::Closing => SidebarClasses {
            hidden: true,
            ..Default::default()
        },
        SidebarState::Open | SidebarState::Collapsed if mobile => SidebarClasses {
            bottom_sheet: true,
            active: state == SidebarState::Open,
            ..Default::default()
        },
        SidebarState::Open | SidebarState::Collapsed => SidebarClasses {
            absolute: true,
            ..Default::default()
        },
    }
}

/// How far the map container moves up, given the sheet's rendered height.
pub fn map_shift_px(width: f64, state: SidebarState, sheet_height: f64) -> f64 {
    if is_mobile(width) && state == SidebarState::Open {
        sheet_height * SHEET_MAP_SHIFT_RATIO
    } else {
        0.0
    }
}

pub fn map_transform_style(shift_px: f64) -> String {
    if shift_px > 0.0 {
        format!("transition: transform 0.3s ease; transform: translateY(-{}px);", shift_px)
    } else {
        "transition: transform 0.3s ease; transform: translateY(0);".to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlsOffset {
    Top(f64),
    /// Clears the mobile bottom bar.
    Bottom(f64),
}

impl ControlsOffset {
    pub fn style(&self) -> String {
        match self {
            ControlsOffset::Top(px) => format!("top: {}px; bottom: auto;", px),
            ControlsOffset::Bottom(px) => format!("top: auto; bottom: {}px;", px),
        }
    }
}

pub fn controls_offset(width: f64) -> ControlsOffset {
    if is_mobile(width) {
        ControlsOffset::Bottom(CONTROLS_BOTTOM_PX)
    } else {
        ControlsOffset::Top(CONTROLS_TOP_PX)
    }
}

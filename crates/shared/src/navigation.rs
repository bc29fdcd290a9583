//! Which screen the URL shows and what has to happen when it changes.

pub const BASE_TITLE: &str =
    "Notfallkarte für Schleswig-Holstein – Finde Polizeidienststellen in deiner Nähe";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Home,
    Detail(String),
}

impl Screen {
    /// `/` is home, anything else names a station slug.
    pub fn from_path(path: &str) -> Self {
        let slug = path.strip_prefix('/').unwrap_or(path).trim_end_matches('/');
        if slug.is_empty() {
            Screen::Home
        } else {
            Screen::Detail(slug.to_string())
        }
    }

    pub fn path(&self) -> String {
        match self {
            Screen::Home => "/".to_string(),
            Screen::Detail(slug) => format!("/{}", slug),
        }
    }

    /// Document and `og:title` text.
    pub fn title(&self) -> String {
        match self {
            Screen::Home => BASE_TITLE.to_string(),
            Screen::Detail(slug) => format!("{} - {}", slug, BASE_TITLE),
        }
    }
}

/// Work triggered by arriving at a screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEffect {
    /// The app pushed this screen itself; only the title follows.
    None,
    /// Clear any open detail and refresh the markers.
    ShowHome,
    /// Look the station up by slug. `recenter` is set on the first load only.
    LoadSlug { slug: String, recenter: bool },
}

/// Tracks the screen currently shown and a screen the app is about to push,
/// so that its own history pushes are not mistaken for back/forward.
#[derive(Debug, Default)]
pub struct Navigation {
    current: Option<Screen>,
    pending: Option<Screen>,
}

impl Navigation {
    pub fn current(&self) -> Option<&Screen> {
        self.current.as_ref()
    }

    /// Prepare an app-initiated move to home. Returns false when home is
    /// already showing and no history entry should be pushed.
    pub fn begin_go_home(&mut self) -> bool {
        if self.current == Some(Screen::Home) {
            return false;
        }
        self.pending = Some(Screen::Home);
        true
    }

    pub fn on_screen_change(&mut self, next: Screen) -> NavEffect {
        let first_load = self.current.is_none();
        let expected = self.pending.take();
        self.current = Some(next.clone());

        if expected.as_ref() == Some(&next) {
            return NavEffect::None;
        }
        match next {
            Screen::Home => NavEffect::ShowHome,
            Screen::Detail(slug) => NavEffect::LoadSlug {
                slug,
                recenter: first_load,
            },
        }
    }
}

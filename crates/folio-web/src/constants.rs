// DOM mount points and cosmetic timings for the web front-end

pub const BG_CANVAS_ID: &str = "bg-canvas";
pub const CHAT_ROOT_ID: &str = "chat-root";
pub const THEME_TOGGLE_ID: &str = "theme-toggle";
pub const PROJECTS_ID: &str = "projects";
pub const PROJECT_FILTERS_ID: &str = "project-filters";
pub const RESUME_BUTTON_ID: &str = "resume-button";
pub const TOASTS_ID: &str = "toasts";

// Skill group containers, paired with their entries in `folio_core::content`
pub const SKILLS_LANGUAGES_ID: &str = "skills-languages";
pub const SKILLS_FRAMEWORKS_ID: &str = "skills-frameworks";
pub const SKILLS_TOOLS_ID: &str = "skills-tools";

// Canvas attribute that starts the background in idle rotation
pub const SCROLL_ROTATION_ATTR: &str = "data-scroll-rotation";
// Switch that flips scroll-driven rotation at runtime
pub const SCROLL_ROTATION_TOGGLE_ID: &str = "scroll-rotation-toggle";

// Entrance and scroll reveals
pub const HEADER_ITEM_SELECTOR: &str = ".animate-on-load";
pub const REVEAL_ITEM_SELECTOR: &str = ".reveal-item";
pub const REVEAL_SECTION_IDS: [&str; 4] = ["about", "skills", "projects", "experience"];
pub const VISIBLE_CLASS: &str = "is-visible";

pub const TOAST_DURATION_MS: i32 = 3000;
pub const THEME_FADE_MS: i32 = 500;

pub const PREFERS_DARK_QUERY: &str = "(prefers-color-scheme: dark)";

//! Static page content: projects, skills, and outbound links.

pub const CONTACT_EMAIL: &str = "7satvikpatil@gmail.com";
pub const GITHUB_PROFILE: &str = "https://github.com/Satvikpatil7";
pub const RESUME_URL: &str =
    "https://drive.google.com/file/d/1-wfrXElfDtxOP_rUFxaqz7liy0IC51MD/view?usp=sharing";

pub const LANGUAGE_SKILLS: &[&str] = &["Java", "C", "Python", "C#", "JavaScript"];
pub const FRAMEWORK_SKILLS: &[&str] = &["React", "Redux", "Tailwind CSS", "Material UI", "Node.js"];
pub const TOOL_SKILLS: &[&str] = &["SQL", "Figma", "AWS", "Azure"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProjectCategory {
    All,
    Web,
    Cloud,
    UiUx,
    Design,
}

impl ProjectCategory {
    pub const FILTERS: [ProjectCategory; 5] = [
        ProjectCategory::All,
        ProjectCategory::Web,
        ProjectCategory::Cloud,
        ProjectCategory::UiUx,
        ProjectCategory::Design,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ProjectCategory::All => "all",
            ProjectCategory::Web => "web",
            ProjectCategory::Cloud => "cloud",
            ProjectCategory::UiUx => "ui-ux",
            ProjectCategory::Design => "design",
        }
    }

    /// Button label. The design bucket holds the Python tooling.
    pub fn label(self) -> &'static str {
        match self {
            ProjectCategory::All => "All Projects",
            ProjectCategory::Web => "Web",
            ProjectCategory::Cloud => "Cloud",
            ProjectCategory::UiUx => "UI/UX",
            ProjectCategory::Design => "Python",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::FILTERS.into_iter().find(|c| c.id() == id)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Project {
    pub title: &'static str,
    pub description: &'static str,
    pub image: &'static str,
    pub github: Option<&'static str>,
    pub live: Option<&'static str>,
    pub tags: &'static [&'static str],
    pub categories: &'static [ProjectCategory],
}

impl Project {
    pub fn in_category(&self, category: ProjectCategory) -> bool {
        category == ProjectCategory::All || self.categories.contains(&category)
    }
}

pub const PROJECTS: &[Project] = &[
    Project {
        title: "README Generator",
        description: "A tool to automatically generate professional README files for your projects.",
        image: "https://images.unsplash.com/photo-1486312338219-ce68d2c6f44d",
        github: Some("https://github.com/Satvikpatil7/README-File-Generator"),
        live: None,
        tags: &["Python"],
        categories: &[ProjectCategory::Design],
    },
    Project {
        title: "AWS WAF Security (CloudDefender)",
        description: "Cloud security solution using AWS WAF for protecting web applications.",
        image: "https://cdn.wallpapersafari.com/30/59/JigpBb.jpg",
        github: Some("https://github.com/Satvikpatil7/CloudDefender"),
        live: None,
        tags: &["AWS", "Security", "Cloud"],
        categories: &[ProjectCategory::Cloud],
    },
    Project {
        title: "Vealthx Fintech",
        description: "Financial technology platform providing innovative solutions.",
        image: "https://i.pinimg.com/736x/9e/3b/a6/9e3ba64814687c57df6476362bfc88d0.jpg",
        github: None,
        live: Some("https://www.vealthx.com/"),
        tags: &["Fintech", "Startup"],
        categories: &[ProjectCategory::Web],
    },
    Project {
        title: "Crypto Site",
        description: "Cryptocurrency information and tracking platform.",
        image: "https://i.pinimg.com/736x/c3/c8/b5/c3c8b5db0add09dc0e5d41402f6cb0af.jpg",
        github: Some("https://github.com/Satvikpatil7/Crypto"),
        live: Some("https://crypto-olive-xi.vercel.app/"),
        tags: &["React", "Crypto API", "Frontend"],
        categories: &[ProjectCategory::Web],
    },
    Project {
        title: "AI Agent (MERN)",
        description: "AI-powered agent built using the MERN stack.",
        image: "https://images.unsplash.com/photo-1485827404703-89b55fcc595e",
        github: Some("https://github.com/Satvikpatil7/AI-Agent-in-MERN"),
        live: None,
        tags: &["MERN", "AI", "Full Stack"],
        categories: &[ProjectCategory::Web],
    },
    Project {
        title: "Nike UI",
        description: "Modern UI design for Nike e-commerce platform.",
        image: "https://i.pinimg.com/736x/9c/03/5c/9c035c7a57060378260f5c97375f4d88.jpg",
        github: None,
        live: Some("https://www.figma.com/proto/ItTHXjmF6Cqjq5nCoBY86Z/nike"),
        tags: &["UI/UX", "Figma", "Design"],
        categories: &[ProjectCategory::UiUx],
    },
    Project {
        title: "Logitech UI",
        description: "UI design for Logitech products showcase.",
        image: "https://i.pinimg.com/736x/04/cc/eb/04ccebef12d8f577d6fe5383631d504c.jpg",
        github: None,
        live: Some("https://www.figma.com/proto/GCLwLDKOQLfqgQm40eCKQs/LOGITECH"),
        tags: &["UI/UX", "Figma", "Design"],
        categories: &[ProjectCategory::UiUx],
    },
    Project {
        title: "DSA Checkbox App",
        description: "Application showcasing category tree implementation with checkboxes.",
        image: "https://images.unsplash.com/photo-1488590528505-98d2b5aba04b",
        github: Some("https://github.com/Satvikpatil7/Category-Tree-Checkbox-App"),
        live: Some("https://category-tree-checkbox-app.vercel.app/"),
        tags: &["React", "Data Structures", "Recursion", "Tree"],
        categories: &[ProjectCategory::Web],
    },
    Project {
        title: "Recipe Search",
        description: "Autocomplete component for searching recipes.",
        image: "https://images.unsplash.com/photo-1461749280684-dccba630e2f6",
        github: Some("https://github.com/Satvikpatil7/Autocomplete-Component"),
        live: Some("https://autocomplete-component-eosin.vercel.app/"),
        tags: &["React", "API", "Frontend", "Debouncing", "Caching"],
        categories: &[ProjectCategory::Web],
    },
];

/// Projects shown under `category`, in list order.
pub fn projects_in(category: ProjectCategory) -> impl Iterator<Item = &'static Project> {
    PROJECTS.iter().filter(move |p| p.in_category(category))
}

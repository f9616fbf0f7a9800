//! Page model: the sections of the exhibition landing page and where they
//! sit in page pixels for a given viewport

use stagehand_core::reveal::RevealEffect;
use stagehand_core::visibility::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Hero,
    Stats,
    Speakers,
    Sponsors,
    Exhibition,
    Footer,
}

impl SectionKind {
    pub const ALL: [SectionKind; 6] = [
        SectionKind::Hero,
        SectionKind::Stats,
        SectionKind::Speakers,
        SectionKind::Sponsors,
        SectionKind::Exhibition,
        SectionKind::Footer,
    ];

    /// Height as a multiple of the viewport height
    fn height_factor(self) -> f64 {
        match self {
            SectionKind::Hero => 1.0,
            SectionKind::Stats => 0.7,
            SectionKind::Speakers => 0.9,
            SectionKind::Sponsors => 0.6,
            SectionKind::Exhibition => 1.0,
            SectionKind::Footer => 0.6,
        }
    }

    /// Heading revealed glyph by glyph when the section scrolls in
    pub fn heading(self) -> Option<(&'static str, RevealEffect)> {
        match self {
            SectionKind::Hero => Some(("WORLD NUCLEAR EXHIBITION", RevealEffect::Routine)),
            SectionKind::Stats => Some(("THE WNE IN NUMBERS", RevealEffect::Blur)),
            SectionKind::Speakers => Some(("SPEAKERS", RevealEffect::Flip)),
            SectionKind::Sponsors => Some(("OUR PARTNERS", RevealEffect::Scale)),
            SectionKind::Exhibition | SectionKind::Footer => None,
        }
    }
}

/// Headline figures
pub const STATS: [(&str, u32, &str); 3] = [
    ("PARTICIPANTS", 36_000, "+"),
    ("EXHIBITORS", 1_070, "+"),
    ("REPRESENTED COUNTRIES", 80, ""),
];

pub const SPEAKERS: [&str; 12] = [
    "MONIQUE BARBUT",
    "ROLAND LESCURE",
    "SYLVIE BERMANN",
    "CÉDRIC KLAPISCH",
    "ELISHA KARMITZ",
    "ANA GIRARDOT",
    "BRUNO PATINO",
    "JUNIE LAU",
    "RAPHAËL FRYDMAN",
    "JEAN-PIERRE DARROUSSIN",
    "MARION COTILLARD",
    "LÉA SEYDOUX",
];

pub const SPONSORS: [&str; 6] = ["EDF", "ORANO", "FRAMATOME", "CEA", "ASSYSTEM", "WESTINGHOUSE"];

/// One card of the exhibition stack, top of the stack first
#[derive(Debug, Clone, Copy)]
pub struct Card {
    pub year: u16,
    pub title: &'static str,
    pub caption: &'static str,
    /// Resting tilt in degrees
    pub rotation: f64,
}

pub const CARDS: [Card; 3] = [
    Card {
        year: 2021,
        title: "World nuclear exhibition",
        caption: "The nuclear energy industry gathers again",
        rotation: -2.0,
    },
    Card {
        year: 2023,
        title: "World nuclear exhibition",
        caption: "Innovation for a low-carbon society",
        rotation: 0.0,
    },
    Card {
        year: 2025,
        title: "World nuclear exhibition",
        caption: "07-09 December 2027 · Paris Nord Villepinte, Hall 6",
        rotation: 2.0,
    },
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Section {
    pub kind: SectionKind,
    pub span: Span,
}

/// Vertical layout of the page in pixels
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    viewport_height: f64,
    sections: Vec<Section>,
}

impl PageLayout {
    pub fn new(viewport_height: f64) -> Self {
        let viewport_height = viewport_height.max(0.0);
        let mut top = 0.0;
        let sections = SectionKind::ALL
            .iter()
            .map(|&kind| {
                let height = (kind.height_factor() * viewport_height).round();
                let section = Section {
                    kind,
                    span: Span::new(top, height),
                };
                top += height;
                section
            })
            .collect();
        Self {
            viewport_height,
            sections,
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn span(&self, kind: SectionKind) -> Span {
        self.sections
            .iter()
            .find(|s| s.kind == kind)
            .map(|s| s.span)
            .unwrap_or_default()
    }

    pub fn total_height(&self) -> f64 {
        self.sections.last().map(|s| s.span.bottom()).unwrap_or(0.0)
    }

    /// Largest scroll position
    pub fn scroll_limit(&self) -> f64 {
        (self.total_height() - self.viewport_height).max(0.0)
    }

    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }
}

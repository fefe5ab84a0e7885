use std::fmt;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum OsmId {
    Node(u64),
    Way(u64),
    Relation(u64),
}

impl OsmId {
    pub fn raw(&self) -> u64 {
        match self {
            Self::Node(x) | Self::Way(x) | Self::Relation(x) => *x,
        }
    }

    pub fn link(&self) -> String {
        match self {
            Self::Node(x) => format!("https://www.openstreetmap.org/node/{x}"),
            Self::Way(x) => format!("https://www.openstreetmap.org/way/{x}"),
            Self::Relation(x) => format!("https://www.openstreetmap.org/relation/{x}"),
        }
    }
}

impl fmt::Debug for OsmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(x) => write!(f, "[node {x}]({})", self.link()),
            Self::Way(x) => write!(f, "[way {x}]({})", self.link()),
            Self::Relation(x) => write!(f, "[relation {x}]({})", self.link()),
        }
    }
}

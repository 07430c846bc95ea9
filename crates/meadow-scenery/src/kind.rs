#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SceneryKind {
    Structure,
    Tree,
    Enclosure,
    OutbuildingSmall,
    Mailbox,
    Bench,
    EnclosureSegment,
}

/// Static data attached to each kind.
#[derive(Debug)]
pub struct KindInfo {
    pub name: &'static str,
    /// Radius of the circular collision footprint.
    pub footprint: f32,
    pub discoverable: bool,
    pub labels: &'static [&'static str],
}

const STRUCTURE: KindInfo = KindInfo {
    name: "structure",
    footprint: 5.0,
    discoverable: true,
    labels: &[
        "Old Farmhouse",
        "Weathered Barn",
        "Quiet Cottage",
        "Stone Homestead",
        "Red Barn",
    ],
};
const TREE: KindInfo = KindInfo {
    name: "tree",
    footprint: 1.2,
    discoverable: true,
    labels: &["Old Oak", "Lone Birch", "Crooked Willow", "Tall Poplar", "Apple Tree"],
};
const ENCLOSURE: KindInfo = KindInfo {
    name: "enclosure",
    footprint: 4.0,
    discoverable: true,
    labels: &["Sheep Pen", "Paddock", "Chicken Run", "Goat Yard"],
};
const OUTBUILDING: KindInfo = KindInfo {
    name: "outbuilding",
    footprint: 2.0,
    discoverable: true,
    labels: &["Tool Shed", "Woodshed", "Potting Shed", "Well House"],
};
const MAILBOX: KindInfo = KindInfo {
    name: "mailbox",
    footprint: 0.4,
    discoverable: true,
    labels: &["Rusty Mailbox", "Blue Mailbox", "Leaning Mailbox"],
};
const BENCH: KindInfo = KindInfo {
    name: "bench",
    footprint: 0.9,
    discoverable: true,
    labels: &["Park Bench", "Memorial Bench", "Picnic Bench"],
};
const ENCLOSURE_SEGMENT: KindInfo = KindInfo {
    name: "fence",
    footprint: 0.3,
    discoverable: false,
    labels: &["Fence"],
};

impl SceneryKind {
    pub const ALL: [SceneryKind; 7] = [
        SceneryKind::Structure,
        SceneryKind::Tree,
        SceneryKind::Enclosure,
        SceneryKind::OutbuildingSmall,
        SceneryKind::Mailbox,
        SceneryKind::Bench,
        SceneryKind::EnclosureSegment,
    ];

    #[inline]
    pub const fn info(self) -> &'static KindInfo {
        match self {
            SceneryKind::Structure => &STRUCTURE,
            SceneryKind::Tree => &TREE,
            SceneryKind::Enclosure => &ENCLOSURE,
            SceneryKind::OutbuildingSmall => &OUTBUILDING,
            SceneryKind::Mailbox => &MAILBOX,
            SceneryKind::Bench => &BENCH,
            SceneryKind::EnclosureSegment => &ENCLOSURE_SEGMENT,
        }
    }

    #[inline]
    pub fn footprint(self) -> f32 {
        self.info().footprint
    }

    #[inline]
    pub fn is_discoverable(self) -> bool {
        self.info().discoverable
    }

    #[inline]
    pub fn name(self) -> &'static str {
        self.info().name
    }
}

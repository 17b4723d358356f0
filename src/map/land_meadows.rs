// Land 1 definition
use super::LandDesc;

pub static LAND1: LandDesc = LandDesc {
    name: "Mushroom Meadows",
    desc: "Level 1 — Basics & Loops. Drag-and-drop blocks, collect coins to reveal the portal.",
    marker_x: 180,
};

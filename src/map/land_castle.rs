// Land 2 definition
use super::LandDesc;

pub static LAND2: LandDesc = LandDesc {
    name: "Koopa Castle",
    desc: "Level 2 — Conditionals & control flow. Build logic to avoid enemies and collect coins.",
    marker_x: 500,
};

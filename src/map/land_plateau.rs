// Land 3 definition
use super::LandDesc;

pub static LAND3: LandDesc = LandDesc {
    name: "Power-Up Plateau",
    desc: "Level 3 — Write methods & parameters. Type code to create reusable functions.",
    marker_x: 760,
};

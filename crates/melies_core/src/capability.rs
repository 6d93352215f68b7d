//! Capability tables for generated animation code.
//!
//! Generated code may only use a fixed safe subset of the renderer's API.
//! The whitelist drives the code-generation prompt; the blacklist drives the
//! sanitizer. Keeping both in one place stops the two from drifting apart.

/// The single permitted text-rendering primitive.
pub const TEXT_ELEMENTS: &[&str] = &["Text"];

/// Permitted primitive shapes, plus the grouping container.
pub const SHAPE_ELEMENTS: &[&str] = &["Circle", "Square", "Rectangle", "Line", "Dot", "VGroup"];

/// Permitted animation verbs.
pub const ANIMATION_ELEMENTS: &[&str] = &[
    "Write",
    "FadeIn",
    "FadeOut",
    "Create",
    "Transform",
    "ReplacementTransform",
    "Uncreate",
    "GrowFromCenter",
    "ShrinkToCenter",
];

/// Permitted positioning and query methods (dotted form, no parentheses).
pub const ALLOWED_METHODS: &[&str] = &[
    "to_edge",
    "shift",
    "next_to",
    "move_to",
    "set_color",
    "scale",
    "rotate",
    "align_to",
    "get_center",
    "get_top",
    "get_bottom",
    "get_left",
    "get_right",
];

/// Permitted named colors, including lettered and shade variants.
pub const ALLOWED_COLORS: &[&str] = &[
    "BLUE", "RED", "GREEN", "YELLOW", "PURPLE", "ORANGE", "PINK", "WHITE", "BLACK", "GREY",
    "GRAY", "BLUE_A", "BLUE_B", "BLUE_C", "BLUE_D", "BLUE_E", "RED_A", "RED_B", "RED_C",
    "RED_D", "RED_E", "GREEN_A", "GREEN_B", "GREEN_C", "GREEN_D", "GREEN_E", "YELLOW_A",
    "YELLOW_B", "YELLOW_C", "YELLOW_D", "YELLOW_E", "GREY_A", "GREY_B", "GREY_C", "GREY_D",
    "GREY_E", "DARK_GREY", "LIGHT_GREY", "DARK_GRAY", "LIGHT_GRAY",
];

/// Construct names the sanitizer strips from generated code.
///
/// Every entry is either unavailable in the constrained render environment
/// or unreliable enough to fail renders routinely.
pub const FORBIDDEN_ELEMENTS: &[&str] = &[
    // LaTeX
    "MathTex",
    "Tex",
    "TexTemplate",
    // Graphing and axes
    "Axes",
    "NumberLine",
    "NumberPlane",
    "get_graph",
    "plot",
    "get_axis_labels",
    // Unreliable animations
    "Flash",
    "Indicate",
    "ApplyMethod",
    "ShowCreation",
    "DrawBorderThenFill",
    // Arrows
    "Arrow",
    "DoubleArrow",
    "CurvedArrow",
    "Vector",
    // 3D elements
    "ThreeDScene",
    "ThreeDAxes",
    "Surface",
    "ParametricSurface",
    // Shapes that fail often
    "Polygon",
    "RegularPolygon",
    "Triangle",
    "Ellipse",
    "Arc",
    "ArcBetweenPoints",
    "CurvedDoubleArrow",
    // Rate functions that may not exist
    "linear",
    "smooth",
    "rush_into",
    "rush_from",
];

/// Required scene class name in generated code.
pub const SCENE_CLASS: &str = "ManimScene";

/// Replacement emitted where a forbidden call-style construct stood.
pub const REMOVED_PLACEHOLDER: &str = "Text(\"Element removed\")";

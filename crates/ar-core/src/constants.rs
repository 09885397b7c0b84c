// Shared scene and interaction tuning constants used by the web frontend.

// Inline preview camera (AR views get their intrinsics from the platform)
pub const CAMERA_FOV_DEGREES: f32 = 70.0;
pub const CAMERA_ZNEAR: f32 = 0.01;
pub const CAMERA_ZFAR: f32 = 20.0;

// Reticle ring (lies flat in the XZ plane, facing up)
pub const RETICLE_INNER_RADIUS: f32 = 0.08;
pub const RETICLE_OUTER_RADIUS: f32 = 0.10;
pub const RETICLE_SEGMENTS: u32 = 32;
pub const RETICLE_COLOR: [f32; 3] = [0.0, 1.0, 0.6]; // #00ff99

// Shape primitives (metres, before the uniform group scale)
pub const BOX_SIZE: [f32; 3] = [0.4, 0.25, 0.4];
pub const SPHERE_RADIUS: f32 = 0.25;
pub const SPHERE_SEGMENTS: u32 = 32;
pub const CYLINDER_RADIUS: f32 = 0.25;
pub const CYLINDER_HEIGHT: f32 = 0.4;
pub const CYLINDER_SEGMENTS: u32 = 24;

// Base platform under every placed shape
pub const BASE_RADIUS: f32 = 0.3;
pub const BASE_HEIGHT: f32 = 0.02;
pub const BASE_SEGMENTS: u32 = 32;
pub const BASE_Y_OFFSET: f32 = -0.135;
pub const BASE_COLOR: [f32; 3] = [0.121_568_63, 0.160_784_32, 0.215_686_28]; // #1f2937

// UI-facing configuration range
pub const SIZE_MIN: f32 = 0.5;
pub const SIZE_MAX: f32 = 2.5;
pub const SIZE_STEP: f32 = 0.1;
pub const DEFAULT_COLOR_HEX: &str = "#ff6b6b";
pub const DEFAULT_COLOR: [f32; 3] = [1.0, 0.419_607_85, 0.419_607_85]; // #ff6b6b
pub const DEFAULT_SIZE: f32 = 1.0;

// Idle spin applied to the active placed object (radians per second)
pub const SPIN_RATE: f32 = 0.5;

// Hemisphere lighting for placed objects
pub const HEMI_SKY_COLOR: [f32; 3] = [1.0, 1.0, 1.0];
pub const HEMI_GROUND_COLOR: [f32; 3] = [0.733, 0.733, 1.0]; // 0xbbbbff
pub const HEMI_INTENSITY: f32 = 1.2;

// Canvas backing-store pixel ratio cap
pub const MAX_DEVICE_PIXEL_RATIO: f64 = 2.0;

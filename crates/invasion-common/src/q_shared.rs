// q_shared.rs — definitions and math shared between the engine and the cgame

use std::f32::consts::PI;

/// Angle indices
pub const PITCH: usize = 0; // up / down
pub const YAW: usize = 1; // left / right
pub const ROLL: usize = 2; // fall over

pub type Vec3 = [f32; 3];
pub type Vec4 = [f32; 4];

/// Quaternion as (x, y, z, w).
pub type Quat = [f32; 4];

// ============================================================
// Degree / radian conversion
// ============================================================

pub const DEG_TO_RAD: f32 = PI / 180.0;
pub const RAD_TO_DEG: f32 = 180.0 / PI;

// ============================================================
// Angle/short conversion
// ============================================================

#[inline]
pub fn angle2short(x: f32) -> i32 {
    ((x * 65536.0 / 360.0) as i32) & 65535
}

#[inline]
pub fn short2angle(x: i16) -> f32 {
    (x as f32) * (360.0 / 65536.0)
}

// ============================================================
// Content flags
// ============================================================

pub const CONTENTS_SOLID: i32 = 1;
pub const CONTENTS_LAVA: i32 = 8;
pub const CONTENTS_SLIME: i32 = 16;
pub const CONTENTS_WATER: i32 = 32;
pub const CONTENTS_FOG: i32 = 64;
pub const CONTENTS_PLAYERCLIP: i32 = 0x10000;
pub const CONTENTS_BODY: i32 = 0x2000000;

pub const MASK_ALL: i32 = -1;
pub const MASK_SOLID: i32 = CONTENTS_SOLID;
pub const MASK_PLAYERSOLID: i32 = CONTENTS_SOLID | CONTENTS_PLAYERCLIP | CONTENTS_BODY;
pub const MASK_WATER: i32 = CONTENTS_WATER | CONTENTS_LAVA | CONTENTS_SLIME;
pub const MASK_OPAQUE: i32 = CONTENTS_SOLID | CONTENTS_SLIME | CONTENTS_LAVA;

// ============================================================
// Player movement types and flags
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum PmType {
    Normal = 0,
    NoClip = 1,
    Spectator = 2,
    Dead = 3,
    Freeze = 4,
    Intermission = 5,
}

pub const PMF_DUCKED: i32 = 1;
pub const PMF_JUMP_HELD: i32 = 2;
pub const PMF_TIME_LAND: i32 = 32;
pub const PMF_RESPAWNED: i32 = 512;
pub const PMF_FOLLOW: i32 = 4096;

// ============================================================
// Button bits
// ============================================================

pub const BUTTON_ATTACK: i32 = 1;
pub const BUTTON_TALK: i32 = 2;
pub const BUTTON_USE_HOLDABLE: i32 = 4;
pub const BUTTON_WALKING: i32 = 16;
pub const BUTTON_ATTACK2: i32 = 32;
pub const BUTTON_ANY: i32 = 2048;

// ============================================================
// Usercmd
// ============================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct UserCmd {
    pub server_time: i32,
    pub buttons: i32,
    pub weapon: u8,
    pub angles: [i16; 3],
    pub forwardmove: i8,
    pub rightmove: i8,
    pub upmove: i8,
}

// ============================================================
// Stats / persistant indices
// ============================================================

pub const MAX_STATS: usize = 16;
pub const MAX_PERSISTANT: usize = 16;
pub const MAX_POWERUPS: usize = 16;

pub const STAT_HEALTH: usize = 0;
pub const STAT_ARMOR: usize = 1;
pub const STAT_DEAD_YAW: usize = 2; // look this direction when dead
pub const STAT_GRAVITY: usize = 3; // packed gravity direction
pub const STAT_SPEC1: usize = 4; // orientation override, high word
pub const STAT_SPEC2: usize = 5; // orientation override, low word
pub const STAT_MAX_HEALTH: usize = 6;

pub const PERS_SCORE: usize = 0;
pub const PERS_TEAM: usize = 1;
pub const PERS_CLASS: usize = 2;

// ============================================================
// Teams and classes
// ============================================================

pub const TEAM_FREE: i32 = 0;
pub const TEAM_RED: i32 = 1;
pub const TEAM_BLUE: i32 = 2;
pub const TEAM_SPECTATOR: i32 = 3;

/// Low bits of PERS_CLASS select the alien race.
pub const ALIEN_RACE_MASK: i32 = 3;
pub const MAX_ALIEN_RACES: usize = 4;

// ============================================================
// Weapons
// ============================================================

pub const WP_NONE: i32 = 0;
pub const WP_MACHINEGUN: i32 = 2;
pub const WP_RAILGUN: i32 = 7;

// ============================================================
// Deathmatch flags (DF_*)
// ============================================================

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct DmFlags: i32 {
        const NO_HEALTH       = 0x00000001;
        const NO_ITEMS        = 0x00000002;
        const WEAPONS_STAY    = 0x00000004;
        const NO_FALLING      = 0x00000008;
        const INSTANT_ITEMS   = 0x00000010;
        const SAME_LEVEL      = 0x00000020;
        const NO_FRIENDLY_FIRE = 0x00000100;
        const FORCE_RESPAWN   = 0x00000400;
        const NO_ARMOR        = 0x00000800;
        const FIXED_FOV       = 0x00008000;
    }
}
pub const DF_NO_FALLING: DmFlags = DmFlags::NO_FALLING;
pub const DF_FIXED_FOV: DmFlags = DmFlags::FIXED_FOV;

// ============================================================
// Refdef flags (RDF_*)
// ============================================================

pub const RDF_NOWORLDMODEL: i32 = 1; // used for player configuration screen
pub const RDF_HYPERSPACE: i32 = 4; // teleportation effect
pub const RDF_UNDERWATER: i32 = 8;

// ============================================================
// Snapshot flags
// ============================================================

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct SnapFlags: i32 {
        const RATE_DELAYED = 1;
        const NOT_ACTIVE   = 2; // snapshot used during connection and for zombies
        const SERVERCOUNT  = 4; // toggled every map_restart so transitions can be detected
    }
}

// ============================================================
// Area visibility
// ============================================================

pub const MAX_MAP_AREA_BYTES: usize = 32; // bit vector of area visibility

// ============================================================
// Cvar flags
// ============================================================

pub const CVAR_ZERO: i32 = 0;
pub const CVAR_ARCHIVE: i32 = 1;
pub const CVAR_CHEAT: i32 = 2;

// ============================================================
// Sound channels
// ============================================================

pub const CHAN_AUTO: i32 = 0;
pub const CHAN_LOCAL: i32 = 1;
pub const CHAN_WEAPON: i32 = 2;
pub const CHAN_VOICE: i32 = 3;
pub const CHAN_ITEM: i32 = 4;
pub const CHAN_BODY: i32 = 5;
pub const CHAN_LOCAL_SOUND: i32 = 6;
pub const CHAN_ANNOUNCER: i32 = 7;

// ============================================================
// Player state
// ============================================================

/// The part of the server player state the view pipeline consumes.
/// Produced once per frame by the movement predictor.
#[derive(Debug, Clone, Copy)]
pub struct PlayerState {
    pub pm_type: PmType,
    pub pm_flags: i32,
    pub bob_cycle: i32,
    pub origin: Vec3,
    pub velocity: Vec3,
    pub viewangles: Vec3,
    pub viewheight: f32,
    pub weapon: i32,
    pub client_num: i32,
    pub stats: [i32; MAX_STATS],
    pub persistant: [i32; MAX_PERSISTANT],
    pub powerups: [i32; MAX_POWERUPS], // level.time the powerup runs out
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            pm_type: PmType::Normal,
            pm_flags: 0,
            bob_cycle: 0,
            origin: [0.0; 3],
            velocity: [0.0; 3],
            viewangles: [0.0; 3],
            viewheight: 26.0,
            weapon: 0,
            client_num: 0,
            stats: [0; MAX_STATS],
            persistant: [0; MAX_PERSISTANT],
            powerups: [0; MAX_POWERUPS],
        }
    }
}

// ============================================================
// Trace results
// ============================================================

/// Result of a box sweep through the collision model.
#[derive(Debug, Clone)]
pub struct Trace {
    pub allsolid: bool,  // if true, plane is not valid
    pub startsolid: bool, // if true, the initial point was in a solid area
    pub fraction: f32,   // time completed, 1.0 = didn't hit anything
    pub endpos: Vec3,    // final position
    pub contents: i32,   // contents on other side of surface hit
}

impl Default for Trace {
    fn default() -> Self {
        Self {
            allsolid: false,
            startsolid: false,
            fraction: 1.0,
            endpos: [0.0; 3],
            contents: 0,
        }
    }
}

// ============================================================
// MATHLIB — Vector operations
// ============================================================

#[inline]
pub fn dot_product(a: &Vec3, b: &Vec3) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
pub fn vector_subtract(a: &Vec3, b: &Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
pub fn vector_add(a: &Vec3, b: &Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

#[inline]
pub fn vector_clear(v: &mut Vec3) {
    v[0] = 0.0;
    v[1] = 0.0;
    v[2] = 0.0;
}

#[inline]
pub fn vector_negate(src: &Vec3) -> Vec3 {
    [-src[0], -src[1], -src[2]]
}

/// veca + scale * vecb
pub fn vector_ma(veca: &Vec3, scale: f32, vecb: &Vec3) -> Vec3 {
    [
        veca[0] + scale * vecb[0],
        veca[1] + scale * vecb[1],
        veca[2] + scale * vecb[2],
    ]
}

pub fn vector_compare(v1: &Vec3, v2: &Vec3) -> bool {
    v1[0] == v2[0] && v1[1] == v2[1] && v1[2] == v2[2]
}

/// Normalize in place, returns original length.
pub fn vector_normalize(v: &mut Vec3) -> f32 {
    let length = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if length != 0.0 {
        let ilength = 1.0 / length;
        v[0] *= ilength;
        v[1] *= ilength;
        v[2] *= ilength;
    }
    length
}

pub fn vector_length(v: &Vec3) -> f32 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

pub fn vector_scale(v: &Vec3, scale: f32) -> Vec3 {
    [v[0] * scale, v[1] * scale, v[2] * scale]
}

pub fn cross_product(v1: &Vec3, v2: &Vec3) -> Vec3 {
    [
        v1[1] * v2[2] - v1[2] * v2[1],
        v1[2] * v2[0] - v1[0] * v2[2],
        v1[0] * v2[1] - v1[1] * v2[0],
    ]
}

// ============================================================
// Angle functions
// ============================================================

pub fn angle_vectors(
    angles: &Vec3,
    forward: Option<&mut Vec3>,
    right: Option<&mut Vec3>,
    up: Option<&mut Vec3>,
) {
    let angle_yaw = angles[YAW].to_radians();
    let sy = angle_yaw.sin();
    let cy = angle_yaw.cos();

    let angle_pitch = angles[PITCH].to_radians();
    let sp = angle_pitch.sin();
    let cp = angle_pitch.cos();

    let angle_roll = angles[ROLL].to_radians();
    let sr = angle_roll.sin();
    let cr = angle_roll.cos();

    if let Some(fwd) = forward {
        fwd[0] = cp * cy;
        fwd[1] = cp * sy;
        fwd[2] = -sp;
    }
    if let Some(r) = right {
        r[0] = -sr * sp * cy + -cr * -sy;
        r[1] = -sr * sp * sy + -cr * cy;
        r[2] = -sr * cp;
    }
    if let Some(u) = up {
        u[0] = cr * sp * cy + -sr * -sy;
        u[1] = cr * sp * sy + -sr * cy;
        u[2] = cr * cp;
    }
}

/// Convenience version of angle_vectors that returns a tuple (forward, right, up).
pub fn angle_vectors_tuple(angles: &Vec3) -> (Vec3, Vec3, Vec3) {
    let mut forward = [0.0f32; 3];
    let mut right = [0.0f32; 3];
    let mut up = [0.0f32; 3];
    angle_vectors(angles, Some(&mut forward), Some(&mut right), Some(&mut up));
    (forward, right, up)
}

/// Build the view basis (forward, right, up) from an Euler angle triple.
pub fn angles_to_axis(angles: &Vec3, axis: &mut [Vec3; 3]) {
    let (forward, right, up) = angle_vectors_tuple(angles);
    axis[0] = forward;
    axis[1] = right;
    axis[2] = up;
}

/// Returns angle normalized to the range [0, 360).
pub fn angle_mod(a: f32) -> f32 {
    (360.0 / 65536.0) * (((a * (65536.0 / 360.0)) as i32 & 65535) as f32)
}

// ============================================================
// Quaternions
// ============================================================

pub fn quat_normalize(q: &mut Quat) -> f32 {
    let length = (q[0] * q[0] + q[1] * q[1] + q[2] * q[2] + q[3] * q[3]).sqrt();
    if length != 0.0 {
        let ilength = 1.0 / length;
        q[0] *= ilength;
        q[1] *= ilength;
        q[2] *= ilength;
        q[3] *= ilength;
    }
    length
}

/// Rotate a vector by a unit quaternion.
pub fn quat_rotate_vector(q: &Quat, v: &Vec3) -> Vec3 {
    let qv = [q[0], q[1], q[2]];
    let t = vector_scale(&cross_product(&qv, v), 2.0);
    let vt = vector_ma(v, q[3], &t);
    vector_add(&vt, &cross_product(&qv, &t))
}

/// Rotate a full basis in place.
pub fn quat_rotate_axis(q: &Quat, axis: &mut [Vec3; 3]) {
    for row in axis.iter_mut() {
        *row = quat_rotate_vector(q, row);
    }
}

/// Shortest-arc rotation taking unit vector `from` onto unit vector `to`.
pub fn quat_between(from: &Vec3, to: &Vec3) -> Quat {
    let d = dot_product(from, to);
    if d < -0.999999 {
        // antiparallel: rotate 180 degrees around any orthogonal axis
        let mut axis = cross_product(&[1.0, 0.0, 0.0], from);
        if vector_length(&axis) < 0.000001 {
            axis = cross_product(&[0.0, 1.0, 0.0], from);
        }
        vector_normalize(&mut axis);
        return [axis[0], axis[1], axis[2], 0.0];
    }
    let c = cross_product(from, to);
    let mut q = [c[0], c[1], c[2], 1.0 + d];
    quat_normalize(&mut q);
    q
}

// ============================================================
// Packed stat decoding
// ============================================================

/// Decode the orientation override packed into two 16 bit stats.
/// Four signed bytes (x, y, z, w), each scaled by 127. The all-zero
/// word means no override is active.
pub fn quat_from_packed(packed: u32) -> Option<Quat> {
    if packed == 0 {
        return None;
    }
    let mut q = [
        (packed & 0xff) as i8 as f32 / 127.0,
        ((packed >> 8) & 0xff) as i8 as f32 / 127.0,
        ((packed >> 16) & 0xff) as i8 as f32 / 127.0,
        ((packed >> 24) & 0xff) as i8 as f32 / 127.0,
    ];
    quat_normalize(&mut q);
    Some(q)
}

/// Recombine the two orientation stats into the packed word.
pub fn orientation_packed(spec1: i32, spec2: i32) -> u32 {
    (((spec1 as u32) << 16) | (spec2 as u32 & 65535)) as u32
}

/// Conventional straight-down gravity.
pub const GRAVITY_DOWN: Vec3 = [0.0, 0.0, -1.0];

/// Decode the gravity direction packed into a single stat: low byte is
/// pitch, high byte is yaw, both in 256-step byte angles. Zero (the
/// unset stat) decodes to straight down. The result points toward the
/// entity's floor.
pub fn gravity_from_stat(stat: i32) -> Vec3 {
    if stat == 0 {
        return GRAVITY_DOWN;
    }
    let pitch = (stat & 0xff) as f32 * (360.0 / 256.0);
    let yaw = ((stat >> 8) & 0xff) as f32 * (360.0 / 256.0);
    let mut dir = [0.0f32; 3];
    angle_vectors(&[pitch, yaw, 0.0], Some(&mut dir), None, None);
    dir
}

/// Pack a pitch/yaw byte-angle pair into the gravity stat encoding.
pub fn gravity_to_stat(pitch_byte: i32, yaw_byte: i32) -> i32 {
    (pitch_byte & 0xff) | ((yaw_byte & 0xff) << 8)
}

// ============================================================
// Tests
// ============================================================

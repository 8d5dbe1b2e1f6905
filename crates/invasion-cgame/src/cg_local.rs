// cg_local.rs — client game state shared across the cgame modules

use invasion_common::cvar::{CvarContext, CvarHandle};
use invasion_common::q_shared::*;

// ============================================================
// Timing windows for the view effects (milliseconds)
// ============================================================

pub const DAMAGE_DEFLECT_TIME: i32 = 100;
pub const DAMAGE_RETURN_TIME: i32 = 400;
pub const DAMAGE_TIME: i32 = 500;
pub const LAND_DEFLECT_TIME: i32 = 150;
pub const LAND_RETURN_TIME: i32 = 300;
pub const STEP_TIME: i32 = 200;
pub const DUCK_TIME: i32 = 100;
pub const ZOOM_TIME: f32 = 150.0;

pub const POWERUP_BLINKS: i32 = 5;
pub const POWERUP_BLINK_TIME: i32 = 1000;

/// Minimum interval between buffered one-shot sounds.
pub const BUFFERED_SOUND_DELAY: i32 = 750;
pub const MAX_SOUNDBUFFER: usize = 20;

/// Third-person camera aims at a point this far ahead of the subject.
pub const FOCUS_DISTANCE: f32 = 512.0;
/// Camera range while following another entity.
pub const FOLLOW_RANGE: f32 = 80.0;

/// Underwater FOV warp.
pub const WAVE_AMPLITUDE: f32 = 1.0;
pub const WAVE_FREQUENCY: f32 = 0.4;

// ============================================================
// Renderer entity
// ============================================================

pub type ModelHandle = i32; // opaque handle, 0 = none
pub type ShaderHandle = i32;
pub type SfxHandle = i32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum RefEntityType {
    #[default]
    Model = 0,
    Sprite = 1,
}

// renderfx flags
pub const RF_MINLIGHT: i32 = 1; // always have some light
pub const RF_FIRST_PERSON: i32 = 2; // only draw through eyes
pub const RF_DEPTHHACK: i32 = 4; // for view weapon z crunching

/// An entity handed to the renderer for one frame.
#[derive(Debug, Clone)]
pub struct RefEntity {
    pub re_type: RefEntityType,
    pub renderfx: i32,
    pub model: ModelHandle,
    pub origin: Vec3,
    pub axis: [Vec3; 3],
    pub frame: i32,
    pub oldframe: i32,
    pub backlerp: f32,
    pub skin_num: i32,
    pub custom_shader: ShaderHandle,
    pub shader_rgba: [u8; 4],
    pub radius: f32,
}

impl Default for RefEntity {
    fn default() -> Self {
        Self {
            re_type: RefEntityType::Model,
            renderfx: 0,
            model: 0,
            origin: [0.0; 3],
            axis: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            frame: 0,
            oldframe: 0,
            backlerp: 0.0,
            skin_num: 0,
            custom_shader: 0,
            shader_rgba: [255; 4],
            radius: 0.0,
        }
    }
}

// ============================================================
// refdef_t — renderer scene definition
// ============================================================

#[derive(Debug, Clone)]
pub struct RefDef {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub fov_x: f32,
    pub fov_y: f32,
    pub vieworg: Vec3,
    pub viewaxis: [Vec3; 3], // forward, right, up
    pub time: i32,
    pub rdflags: i32, // RDF_NOWORLDMODEL, etc
    pub areamask: [u8; MAX_MAP_AREA_BYTES],
}

impl Default for RefDef {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            fov_x: 0.0,
            fov_y: 0.0,
            vieworg: [0.0; 3],
            viewaxis: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            time: 0,
            rdflags: 0,
            areamask: [0; MAX_MAP_AREA_BYTES],
        }
    }
}

// ============================================================
// Snapshot
// ============================================================

/// One server frame as handed over by the snapshot system.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot {
    pub snap_flags: SnapFlags,
    pub server_time: i32,
    pub areamask: [u8; MAX_MAP_AREA_BYTES],
    pub ps: PlayerState,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            snap_flags: SnapFlags::empty(),
            server_time: 0,
            areamask: [0; MAX_MAP_AREA_BYTES],
            ps: PlayerState::default(),
        }
    }
}

// ============================================================
// Stereo rendering
// ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StereoFrame {
    Center,
    Left,
    Right,
}

// ============================================================
// View orientation override
// ============================================================

/// How the final view basis is produced. The override quaternion comes
/// from two packed stats and supports standing on walls and ceilings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewOrientation {
    Standard,
    QuaternionOverride(Quat),
}

impl ViewOrientation {
    /// Resolve the override once per frame from the packed stat pair.
    pub fn from_player_state(ps: &PlayerState) -> Self {
        let packed = orientation_packed(ps.stats[STAT_SPEC1], ps.stats[STAT_SPEC2]);
        match quat_from_packed(packed) {
            Some(q) => ViewOrientation::QuaternionOverride(q),
            None => ViewOrientation::Standard,
        }
    }
}

// ============================================================
// cg_t — per-level transient state, wiped on each map change
// ============================================================

#[derive(Debug, Clone)]
pub struct CgState {
    pub client_frame: i32, // incremented each valid frame
    pub demo_playback: bool,

    pub time: i32,     // this is the time value that the client is rendering at
    pub old_time: i32, // time at last frame, used for missing digit painting etc
    pub frametime: i32, // cg.time - cg.oldTime

    /// If set, only the loading pacifier is drawn.
    pub info_screen_text: String,

    pub snap: Option<Snapshot>, // latest valid snapshot

    pub predicted_player_state: PlayerState,
    pub predicted_error: Vec3,
    pub predicted_error_time: i32,

    pub hyperspace: bool, // true if prediction has hit a trigger_teleport
    pub rendering_third_person: bool,

    pub weapon_select: i32,

    // view rendering
    pub refdef: RefDef,
    pub refdef_view_angles: Vec3, // will be converted to refdef.viewaxis

    // transient view effects, each owned by one producer
    pub kick_angles: Vec3, // weapon kicks
    pub kick_origin: Vec3,

    pub v_dmg_pitch: f32, // damage kick
    pub v_dmg_roll: f32,
    pub damage_time: i32,
    pub damage_value: f32,
    pub damage_x: f32,
    pub damage_y: f32,

    pub land_change: f32, // for landing hard
    pub land_time: i32,

    pub duck_change: f32, // for duck viewheight smoothing
    pub duck_time: i32,

    pub step_change: Vec3, // for stair up smoothing
    pub step_time: i32,

    // auto rotating items
    pub bobcycle: i32,
    pub bobfracsin: f32,
    pub xyspeed: f32,

    // zoom key
    pub zoomed: bool,
    pub zoom_time: i32,
    pub zoom_sensitivity: f32,

    // weapon-toggled zoom and its button edge detector
    pub rail_zoom: bool,
    pub last_buttons: i32,

    pub night_vision: bool,

    // orbiting camera
    pub next_orbit_time: i32,

    // buffered one-shot sounds: monotonic index pair into a fixed ring
    pub sound_buffer: [SfxHandle; MAX_SOUNDBUFFER],
    pub sound_buffer_in: usize,
    pub sound_buffer_out: usize,
    pub sound_time: i32, // next time a buffered sound may play

    // development tool
    pub test_gun: bool,
    pub test_model_entity: RefEntity,
    pub test_model_name: String,
}

impl Default for CgState {
    fn default() -> Self {
        Self {
            client_frame: 0,
            demo_playback: false,
            time: 0,
            old_time: 0,
            frametime: 0,
            info_screen_text: String::new(),
            snap: None,
            predicted_player_state: PlayerState::default(),
            predicted_error: [0.0; 3],
            predicted_error_time: 0,
            hyperspace: false,
            rendering_third_person: false,
            weapon_select: 0,
            refdef: RefDef::default(),
            refdef_view_angles: [0.0; 3],
            kick_angles: [0.0; 3],
            kick_origin: [0.0; 3],
            v_dmg_pitch: 0.0,
            v_dmg_roll: 0.0,
            damage_time: 0,
            damage_value: 0.0,
            damage_x: 0.0,
            damage_y: 0.0,
            land_change: 0.0,
            land_time: 0,
            duck_change: 0.0,
            duck_time: 0,
            step_change: [0.0; 3],
            step_time: 0,
            bobcycle: 0,
            bobfracsin: 0.0,
            xyspeed: 0.0,
            zoomed: false,
            zoom_time: 0,
            zoom_sensitivity: 1.0,
            rail_zoom: false,
            last_buttons: 0,
            night_vision: false,
            next_orbit_time: 0,
            sound_buffer: [0; MAX_SOUNDBUFFER],
            sound_buffer_in: 0,
            sound_buffer_out: 0,
            sound_time: 0,
            test_gun: false,
            test_model_entity: RefEntity::default(),
            test_model_name: String::new(),
        }
    }
}

// ============================================================
// cgs_t — persistent through an entire level load
// ============================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct GlConfig {
    pub vid_width: i32,
    pub vid_height: i32,
}

/// Handles registered at level load.
#[derive(Debug, Clone, Copy, Default)]
pub struct CgMedia {
    pub view_blood_shader: ShaderHandle,
    pub wear_off_sound: SfxHandle,
}

/// Server-configured team numbers for the two asymmetric sides.
#[derive(Debug, Clone, Copy)]
pub struct TeamInfo {
    pub marine_team: i32,
    pub alien_team: i32,
}

impl Default for TeamInfo {
    fn default() -> Self {
        Self {
            marine_team: TEAM_RED,
            alien_team: TEAM_BLUE,
        }
    }
}

/// Per-race base field of view for the alien side.
pub const ALIEN_FOV: [i32; MAX_ALIEN_RACES] = [100, 110, 90, 120];

pub struct CgStatic {
    pub glconfig: GlConfig,
    pub media: CgMedia,
    pub team_info: TeamInfo,
    /// Spectator follow sub-mode: 0 = chase camera from raw input,
    /// 1 = orbiting third person, 2 = first person.
    pub follow_mode: i32,
    pub dmflags: DmFlags,

    pub cvars: CvarContext,

    // cached cvar handles, registered in cg_main
    pub cg_viewsize: CvarHandle,
    pub cg_fov: CvarHandle,
    pub cg_zoomfov: CvarHandle,
    pub cg_third_person: CvarHandle,
    pub cg_third_person_range: CvarHandle,
    pub cg_third_person_angle: CvarHandle,
    pub cg_camera_orbit: CvarHandle,
    pub cg_camera_orbit_delay: CvarHandle,
    pub cg_camera_mode: CvarHandle,
    pub cg_error_decay: CvarHandle,
    pub cg_run_pitch: CvarHandle,
    pub cg_run_roll: CvarHandle,
    pub cg_bob_pitch: CvarHandle,
    pub cg_bob_roll: CvarHandle,
    pub cg_bob_up: CvarHandle,
    pub cg_stats: CvarHandle,
    pub cg_gun_x: CvarHandle,
    pub cg_gun_y: CvarHandle,
    pub cg_gun_z: CvarHandle,
    pub timescale: CvarHandle,
    pub cg_timescale_fade_end: CvarHandle,
    pub cg_timescale_fade_speed: CvarHandle,
}

impl Default for CgStatic {
    fn default() -> Self {
        Self {
            glconfig: GlConfig::default(),
            media: CgMedia::default(),
            team_info: TeamInfo::default(),
            follow_mode: 0,
            dmflags: DmFlags::empty(),
            cvars: CvarContext::new(),
            cg_viewsize: 0,
            cg_fov: 0,
            cg_zoomfov: 0,
            cg_third_person: 0,
            cg_third_person_range: 0,
            cg_third_person_angle: 0,
            cg_camera_orbit: 0,
            cg_camera_orbit_delay: 0,
            cg_camera_mode: 0,
            cg_error_decay: 0,
            cg_run_pitch: 0,
            cg_run_roll: 0,
            cg_bob_pitch: 0,
            cg_bob_roll: 0,
            cg_bob_up: 0,
            cg_stats: 0,
            cg_gun_x: 0,
            cg_gun_y: 0,
            cg_gun_z: 0,
            timescale: 0,
            cg_timescale_fade_end: 0,
            cg_timescale_fade_speed: 0,
        }
    }
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------
    // defaults
    // -------------------------------------------------------

    #[test]
    fn test_cg_state_default_effects_idle() {
        let cg = CgState::default();
        assert_eq!(cg.damage_time, 0);
        assert_eq!(cg.kick_angles, [0.0; 3]);
        assert_eq!(cg.step_change, [0.0; 3]);
        assert_eq!(cg.sound_buffer_in, 0);
        assert_eq!(cg.sound_buffer_out, 0);
        assert!(!cg.zoomed);
        assert!((cg.zoom_sensitivity - 1.0).abs() < 1e-6);
        assert!(cg.snap.is_none());
    }

    #[test]
    fn test_refdef_default_axis_is_identity() {
        let rd = RefDef::default();
        assert_eq!(rd.viewaxis[0], [1.0, 0.0, 0.0]);
        assert_eq!(rd.viewaxis[1], [0.0, 1.0, 0.0]);
        assert_eq!(rd.viewaxis[2], [0.0, 0.0, 1.0]);
        assert_eq!(rd.rdflags, 0);
    }

    // -------------------------------------------------------
    // orientation override resolution
    // -------------------------------------------------------

    #[test]
    fn test_view_orientation_standard_when_stats_zero() {
        let ps = PlayerState::default();
        assert_eq!(ViewOrientation::from_player_state(&ps), ViewOrientation::Standard);
    }

    #[test]
    fn test_view_orientation_override_when_stats_set() {
        let mut ps = PlayerState::default();
        // w byte in the high word
        ps.stats[STAT_SPEC1] = 127 << 8;
        ps.stats[STAT_SPEC2] = 0;
        match ViewOrientation::from_player_state(&ps) {
            ViewOrientation::QuaternionOverride(q) => {
                assert!((q[3] - 1.0).abs() < 1e-4);
            }
            ViewOrientation::Standard => panic!("expected an override"),
        }
    }

    #[test]
    fn test_alien_fov_table_covers_all_races() {
        assert_eq!(ALIEN_FOV.len(), MAX_ALIEN_RACES);
        for fov in ALIEN_FOV {
            assert!(fov >= 1 && fov <= 160);
        }
    }
}

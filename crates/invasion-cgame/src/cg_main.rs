// cg_main.rs — cgame initialization and per-frame cvar upkeep

use invasion_common::common::com_dprintf;
use invasion_common::q_shared::{CVAR_ARCHIVE, CVAR_CHEAT, CVAR_ZERO};

use crate::cg_local::CgStatic;

// ============================================================
// CG_RegisterCvars
// ============================================================

/// Registers the view cvar table and caches the handles on cgs.
pub fn cg_register_cvars(cgs: &mut CgStatic) {
    cgs.cg_viewsize = cgs.cvars.register("cg_viewsize", "100", CVAR_ARCHIVE);
    cgs.cg_fov = cgs.cvars.register("cg_fov", "90", CVAR_ARCHIVE);
    cgs.cg_zoomfov = cgs.cvars.register("cg_zoomFov", "22.5", CVAR_ARCHIVE);
    cgs.cg_third_person = cgs.cvars.register("cg_thirdPerson", "0", CVAR_CHEAT);
    cgs.cg_third_person_range = cgs.cvars.register("cg_thirdPersonRange", "40", CVAR_CHEAT);
    cgs.cg_third_person_angle = cgs.cvars.register("cg_thirdPersonAngle", "0", CVAR_CHEAT);
    cgs.cg_camera_orbit = cgs.cvars.register("cg_cameraOrbit", "0", CVAR_CHEAT);
    cgs.cg_camera_orbit_delay = cgs.cvars.register("cg_cameraOrbitDelay", "50", CVAR_ARCHIVE);
    cgs.cg_camera_mode = cgs.cvars.register("com_cameraMode", "0", CVAR_CHEAT);
    cgs.cg_error_decay = cgs.cvars.register("cg_errordecay", "100", CVAR_ZERO);
    cgs.cg_run_pitch = cgs.cvars.register("cg_runpitch", "0.002", CVAR_ARCHIVE);
    cgs.cg_run_roll = cgs.cvars.register("cg_runroll", "0.005", CVAR_ARCHIVE);
    cgs.cg_bob_pitch = cgs.cvars.register("cg_bobpitch", "0.002", CVAR_ARCHIVE);
    cgs.cg_bob_roll = cgs.cvars.register("cg_bobroll", "0.002", CVAR_ARCHIVE);
    cgs.cg_bob_up = cgs.cvars.register("cg_bobup", "0.005", CVAR_ARCHIVE);
    cgs.cg_stats = cgs.cvars.register("cg_stats", "0", CVAR_ZERO);
    cgs.cg_gun_x = cgs.cvars.register("cg_gunX", "0", CVAR_CHEAT);
    cgs.cg_gun_y = cgs.cvars.register("cg_gunY", "0", CVAR_CHEAT);
    cgs.cg_gun_z = cgs.cvars.register("cg_gunZ", "0", CVAR_CHEAT);
    cgs.timescale = cgs.cvars.register("timescale", "1", CVAR_ZERO);
    cgs.cg_timescale_fade_end = cgs.cvars.register("cg_timescaleFadeEnd", "1", CVAR_ZERO);
    cgs.cg_timescale_fade_speed = cgs.cvars.register("cg_timescaleFadeSpeed", "0", CVAR_ZERO);
}

// ============================================================
// CG_UpdateCvars
// ============================================================

/// Per-frame sweep over externally changed variables. With the registry
/// owned by the cgame there is no cache to refresh; draining the
/// modified flags keeps them meaningful for the next frame.
pub fn cg_update_cvars(cgs: &mut CgStatic) {
    let changed = cgs.cvars.check_modified();
    for name in changed {
        com_dprintf(&format!("cvar changed: {}\n", name));
    }
}

// ============================================================
// CG_Init
// ============================================================

/// Called after every level change or subsystem restart. Media handles
/// on cgs are filled in by the embedding client during precache.
pub fn cg_init(cgs: &mut CgStatic) {
    cg_register_cvars(cgs);
}

// ============================================================
// Tests
// ============================================================

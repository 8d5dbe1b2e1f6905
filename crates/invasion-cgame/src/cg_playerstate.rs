// cg_playerstate.rs — producers for the transient view effects
//
// Each timed effect the view composers decay is armed here by exactly
// one producer. Producers only write their own field group plus the
// event timestamp; the composers read and decay, never reset.

use invasion_common::q_shared::*;

use crate::cg_local::{CgState, STEP_TIME};

// ============================================================
// CG_DamageFeedback
// ============================================================

/// Directional damage indication. `yaw_byte`/`pitch_byte` encode the
/// attack direction in 256-step byte angles; 255/255 means
/// non-directional (drowning, slime).
pub fn cg_damage_feedback(cg: &mut CgState, yaw_byte: i32, pitch_byte: i32, damage: f32) {
    let mut kick = damage * 2.0;
    if kick < 5.0 {
        kick = 5.0;
    }
    if kick > 10.0 {
        kick = 10.0;
    }

    if yaw_byte == 255 && pitch_byte == 255 {
        cg.damage_x = 0.0;
        cg.damage_y = 0.0;
        cg.v_dmg_roll = 0.0;
        cg.v_dmg_pitch = -kick;
    } else {
        let angles = [
            pitch_byte as f32 / 255.0 * 360.0,
            yaw_byte as f32 / 255.0 * 360.0,
            0.0,
        ];
        let mut dir = [0.0f32; 3];
        angle_vectors(&angles, Some(&mut dir), None, None);
        let dir = vector_negate(&dir);

        let front = dot_product(&dir, &cg.refdef.viewaxis[0]);
        let side = dot_product(&dir, &cg.refdef.viewaxis[1]);
        let up = dot_product(&dir, &cg.refdef.viewaxis[2]);

        cg.v_dmg_roll = kick * side;
        cg.v_dmg_pitch = -kick * front;

        cg.damage_x = (-side).clamp(-1.0, 1.0);
        cg.damage_y = up.clamp(-1.0, 1.0);
    }

    cg.damage_value = kick;
    cg.damage_time = cg.time;
}

// ============================================================
// Landing and duck height producers
// ============================================================

/// Arm the landing dip. `change` is the (negative) vertical deflection,
/// already scaled by the fall severity.
pub fn cg_land_change(cg: &mut CgState, change: f32) {
    cg.land_change = change;
    cg.land_time = cg.time;
}

/// Arm the crouch transition. `change` is the delta the eased view
/// offset starts from, signed along the gravity direction.
pub fn cg_duck_change(cg: &mut CgState, change: f32) {
    cg.duck_change = change;
    cg.duck_time = cg.time;
}

// ============================================================
// CG_StepSmooth
// ============================================================

/// Remember a stair-step origin jump so the composer can ease it out.
/// A step taken mid-decay carries the undecayed remainder over, so
/// quick staircases don't pop.
pub fn cg_step_smooth(cg: &mut CgState, change: &Vec3) {
    let mut total = *change;
    let dt = cg.time - cg.step_time;
    if dt < STEP_TIME {
        let carry = (STEP_TIME - dt) as f32 / STEP_TIME as f32;
        total = vector_ma(&total, carry, &cg.step_change);
    }
    cg.step_change = total;
    cg.step_time = cg.time;
}

// ============================================================
// Weapon kick intake
// ============================================================

/// Store the weapon recoil offsets the server reported for this frame.
pub fn cg_weapon_kick(cg: &mut CgState, kick_angles: &Vec3, kick_origin: &Vec3) {
    cg.kick_angles = *kick_angles;
    cg.kick_origin = *kick_origin;
}

// ============================================================
// Tests
// ============================================================

// cg_view.rs -- setup all the parameters (position, angle, etc)
// for a 3D rendering

use std::f32::consts::PI;

use invasion_common::common::com_printf;
use invasion_common::q_shared::*;

use crate::cg_local::*;
use crate::cg_main::cg_update_cvars;
use crate::cg_syscalls::{ClientSystem, CollisionModel, Renderer, SceneAssembler, SoundBackend};

/*
=============================================================================

  MODEL TESTING

Model viewing can begin with either "testmodel <modelname>" or
"testgun <modelname>".

Testmodel will create a fake entity 100 units in front of the current view
position, directly facing the viewer. It will remain immobile, so you can
move around it to view it from different angles.

Testgun will cause the model to follow the player around and supress the
real view weapon model. The default frame 0 of most guns is completely off
screen, so you will probably have to cycle a couple frames to see it.

"nextframe", "prevframe", "nextskin", and "prevskin" commands will change
the frame or skin of the testmodel.

If a gun is being tested, the "cg_gunX", "cg_gunY", and "cg_gunZ" variables
will let you adjust the positioning.

=============================================================================
*/

// ============================================================
// CG_TestModel_f
// ============================================================

/// Creates an entity in front of the current position, which
/// can then be moved around.
pub fn cg_test_model_f(cg: &mut CgState, renderer: &mut dyn Renderer, args: &[&str]) {
    cg.test_model_entity = RefEntity::default();
    if args.len() < 2 {
        return;
    }

    cg.test_model_name = args[1].to_string();
    cg.test_model_entity.model = renderer.register_model(&cg.test_model_name);

    if args.len() == 3 {
        cg.test_model_entity.backlerp = args[2].parse::<f32>().unwrap_or(0.0);
        cg.test_model_entity.frame = 1;
        cg.test_model_entity.oldframe = 0;
    }
    if cg.test_model_entity.model == 0 {
        com_printf("Can't register model\n");
        return;
    }

    cg.test_model_entity.origin =
        vector_ma(&cg.refdef.vieworg, 100.0, &cg.refdef.viewaxis[0]);

    let angles = [0.0, 180.0 + cg.refdef_view_angles[YAW], 0.0];
    angles_to_axis(&angles, &mut cg.test_model_entity.axis);
    cg.test_gun = false;
}

// ============================================================
// CG_TestGun_f
// ============================================================

/// Replaces the current view weapon with the given model.
pub fn cg_test_gun_f(cg: &mut CgState, renderer: &mut dyn Renderer, args: &[&str]) {
    cg_test_model_f(cg, renderer, args);
    cg.test_gun = true;
    cg.test_model_entity.renderfx = RF_MINLIGHT | RF_DEPTHHACK | RF_FIRST_PERSON;
}

pub fn cg_test_model_next_frame_f(cg: &mut CgState) {
    cg.test_model_entity.frame += 1;
    com_printf(&format!("frame {}\n", cg.test_model_entity.frame));
}

pub fn cg_test_model_prev_frame_f(cg: &mut CgState) {
    cg.test_model_entity.frame -= 1;
    if cg.test_model_entity.frame < 0 {
        cg.test_model_entity.frame = 0;
    }
    com_printf(&format!("frame {}\n", cg.test_model_entity.frame));
}

pub fn cg_test_model_next_skin_f(cg: &mut CgState) {
    cg.test_model_entity.skin_num += 1;
    com_printf(&format!("skin {}\n", cg.test_model_entity.skin_num));
}

pub fn cg_test_model_prev_skin_f(cg: &mut CgState) {
    cg.test_model_entity.skin_num -= 1;
    if cg.test_model_entity.skin_num < 0 {
        cg.test_model_entity.skin_num = 0;
    }
    com_printf(&format!("skin {}\n", cg.test_model_entity.skin_num));
}

fn cg_add_test_model(cg: &mut CgState, cgs: &CgStatic, renderer: &mut dyn Renderer) {
    // re-register the model, because the level may have changed
    cg.test_model_entity.model = renderer.register_model(&cg.test_model_name);
    if cg.test_model_entity.model == 0 {
        com_printf("Can't register model\n");
        return;
    }

    // if testing a gun, set the origin relative to the view origin
    if cg.test_gun {
        cg.test_model_entity.origin = cg.refdef.vieworg;
        cg.test_model_entity.axis = cg.refdef.viewaxis;

        // allow the position to be adjusted
        for i in 0..3 {
            cg.test_model_entity.origin[i] +=
                cg.refdef.viewaxis[0][i] * cgs.cvars.value(cgs.cg_gun_x);
            cg.test_model_entity.origin[i] +=
                cg.refdef.viewaxis[1][i] * cgs.cvars.value(cgs.cg_gun_y);
            cg.test_model_entity.origin[i] +=
                cg.refdef.viewaxis[2][i] * cgs.cvars.value(cgs.cg_gun_z);
        }
    }

    renderer.add_ref_entity(&cg.test_model_entity.clone());
}

//============================================================================

// ============================================================
// CG_CalcVrect
// ============================================================

/// Sets the coordinates of the rendered window.
pub fn cg_calc_vrect(cg: &mut CgState, cgs: &mut CgStatic) {
    // the intermission should allways be full screen
    let intermission = matches!(&cg.snap, Some(s) if s.ps.pm_type == PmType::Intermission);

    let size;
    if intermission {
        size = 100;
    } else {
        // bound normal viewsize
        let viewsize = cgs.cvars.integer(cgs.cg_viewsize);
        if viewsize < 30 {
            cgs.cvars.set_string(cgs.cg_viewsize, "30");
            size = 30;
        } else if viewsize > 100 {
            cgs.cvars.set_string(cgs.cg_viewsize, "100");
            size = 100;
        } else {
            size = viewsize;
        }
    }

    cg.refdef.width = cgs.glconfig.vid_width * size / 100;
    cg.refdef.width &= !1;

    cg.refdef.height = cgs.glconfig.vid_height * size / 100;
    cg.refdef.height &= !1;

    cg.refdef.x = (cgs.glconfig.vid_width - cg.refdef.width) / 2;
    cg.refdef.y = (cgs.glconfig.vid_height - cg.refdef.height) / 2;
}

//==============================================================================

// ============================================================
// Timed easing primitives
// ============================================================

/// Two-phase ramp shared by the damage shake and the landing dip:
/// rises linearly to 1 over `deflect` ms, then falls linearly back to
/// zero over `ret` ms. Zero outside the window.
pub fn kick_ratio(elapsed: i32, deflect: i32, ret: i32) -> f32 {
    if elapsed < 0 {
        return 0.0;
    }
    if elapsed < deflect {
        return elapsed as f32 / deflect as f32;
    }
    let f = 1.0 - (elapsed - deflect) as f32 / ret as f32;
    if f > 0.0 {
        f
    } else {
        0.0
    }
}

/// Single-phase decay shared by the duck and stair-step smoothing:
/// falls linearly from 1 to 0 over `window` ms.
pub fn decay_ratio(elapsed: i32, window: i32) -> f32 {
    if elapsed < 0 || elapsed >= window {
        return 0.0;
    }
    (window - elapsed) as f32 / window as f32
}

// ============================================================
// CG_OffsetThirdPersonView
// ============================================================

pub fn cg_offset_third_person_view(
    cg: &mut CgState,
    cgs: &CgStatic,
    cm: &dyn CollisionModel,
    client: &dyn ClientSystem,
) {
    let mins = [-4.0, -4.0, -4.0];
    let maxs = [4.0, 4.0, 4.0];

    let following = matches!(&cg.snap, Some(s) if s.ps.pm_flags & PMF_FOLLOW != 0);
    let ps = cg.predicted_player_state;
    let gravity = gravity_from_stat(ps.stats[STAT_GRAVITY]);

    if !following || cgs.follow_mode == 1 {
        cg.refdef.vieworg = vector_ma(&cg.refdef.vieworg, -ps.viewheight, &gravity);

        let mut focus_angles = cg.refdef_view_angles;

        // if dead, look at the killer
        if ps.stats[STAT_HEALTH] <= 0 {
            focus_angles[YAW] = ps.stats[STAT_DEAD_YAW] as f32;
            cg.refdef_view_angles[YAW] = ps.stats[STAT_DEAD_YAW] as f32;
        }

        if focus_angles[PITCH] > 45.0 {
            focus_angles[PITCH] = 45.0; // don't go too far overhead
        } else if focus_angles[PITCH] < -45.0 {
            focus_angles[PITCH] = -45.0;
        }

        let mut view = vector_ma(&cg.refdef.vieworg, -8.0, &gravity);

        cg.refdef_view_angles[PITCH] *= 0.5;

        // resolve the camera frame, honoring the orientation override
        let forward;
        let right;
        let focus_point;
        match ViewOrientation::from_player_state(&ps) {
            ViewOrientation::Standard => {
                let (fwd, _, _) = angle_vectors_tuple(&focus_angles);
                focus_point = vector_ma(&cg.refdef.vieworg, FOCUS_DISTANCE, &fwd);

                let (fwd, rgt, _) = angle_vectors_tuple(&cg.refdef_view_angles);
                forward = fwd;
                right = rgt;
            }
            ViewOrientation::QuaternionOverride(quat) => {
                let mut axis = [[0.0f32; 3]; 3];
                angles_to_axis(&focus_angles, &mut axis);
                quat_rotate_axis(&quat, &mut axis);
                focus_point = vector_ma(&cg.refdef.vieworg, FOCUS_DISTANCE, &axis[0]);

                angles_to_axis(&cg.refdef_view_angles, &mut axis);
                quat_rotate_axis(&quat, &mut axis);
                forward = axis[0];
                right = axis[1];
            }
        }

        let range = if !following {
            cgs.cvars.value(cgs.cg_third_person_range)
        } else {
            FOLLOW_RANGE
        };

        let third_person_angle = cgs.cvars.value(cgs.cg_third_person_angle);
        let forward_scale = (third_person_angle / 180.0 * PI).cos();
        let side_scale = (third_person_angle / 180.0 * PI).sin();
        view = vector_ma(&view, -range * forward_scale, &forward);
        view = vector_ma(&view, -range * side_scale, &right);

        // trace a ray from the origin to the viewpoint to make sure the
        // view isn't in a solid block. Use a small box to prevent the
        // view from near clipping anything.
        if cgs.cvars.integer(cgs.cg_camera_mode) == 0 {
            let trace = cm.box_trace(
                &cg.refdef.vieworg,
                &mins,
                &maxs,
                &view,
                ps.client_num,
                MASK_SOLID,
            );

            if trace.fraction != 1.0 {
                view = trace.endpos;
                view = vector_ma(&view, -(1.0 - trace.fraction) * 32.0, &gravity);

                // try another trace to this position, because a tunnel may
                // have the ceiling close enough that this is poking out
                let trace = cm.box_trace(
                    &cg.refdef.vieworg,
                    &mins,
                    &maxs,
                    &view,
                    ps.client_num,
                    MASK_SOLID,
                );
                view = trace.endpos;
            }
        }

        cg.refdef.vieworg = view;

        // select pitch to look at focus point from vieworg
        let focus_vec = vector_subtract(&focus_point, &cg.refdef.vieworg);

        let along = dot_product(&gravity, &focus_vec);
        let flat = vector_ma(&focus_vec, -along, &gravity);
        let lifted = vector_scale(&gravity, along);
        let height = if along > 0.0 {
            -vector_length(&lifted)
        } else {
            vector_length(&lifted)
        };

        let mut focus_dist = vector_length(&flat);
        if focus_dist < 1.0 {
            focus_dist = 1.0; // should never happen
        }

        cg.refdef_view_angles[PITCH] = -180.0 / PI * height.atan2(focus_dist);
        cg.refdef_view_angles[YAW] -= third_person_angle;
    } else {
        // riding another entity: build the camera from the raw input
        // angles instead of the simulated view
        let cmd = client.user_cmd(client.current_cmd_number());

        cg.refdef_view_angles[YAW] = short2angle(cmd.angles[YAW]);

        let mut pitch = short2angle(cmd.angles[PITCH]);
        pitch *= 2.0;
        if pitch < -90.0 {
            pitch = -90.0;
        } else if pitch > 90.0 {
            pitch = 90.0;
        }
        cg.refdef_view_angles[PITCH] = pitch;

        cg.refdef.vieworg = vector_ma(&cg.refdef.vieworg, -ps.viewheight, &gravity);

        let mut view = vector_ma(&cg.refdef.vieworg, -8.0, &gravity);

        let mut forward = [0.0f32; 3];
        angle_vectors(&cg.refdef_view_angles, Some(&mut forward), None, None);
        view = vector_ma(&view, -FOLLOW_RANGE, &forward);

        if cgs.cvars.integer(cgs.cg_camera_mode) == 0 {
            let trace = cm.box_trace(
                &cg.refdef.vieworg,
                &mins,
                &maxs,
                &view,
                ps.client_num,
                MASK_SOLID,
            );
            if trace.fraction != 1.0 {
                view = trace.endpos;
            }
        }

        cg.refdef.vieworg = view;
    }
}

// ============================================================
// CG_StepOffset
// ============================================================

fn cg_step_offset(cg: &mut CgState) {
    // smooth out stair climbing
    let ratio = decay_ratio(cg.time - cg.step_time, STEP_TIME);
    if ratio > 0.0 {
        for i in 0..3 {
            cg.refdef.vieworg[i] -= cg.step_change[i] * ratio;
        }
    }
}

// ============================================================
// CG_OffsetFirstPersonView
// ============================================================

pub fn cg_offset_first_person_view(cg: &mut CgState, cgs: &CgStatic) {
    let snap = match &cg.snap {
        Some(s) => *s,
        None => return,
    };

    if snap.ps.pm_type == PmType::Intermission {
        return;
    }

    let ps = cg.predicted_player_state;
    let gravity = gravity_from_stat(ps.stats[STAT_GRAVITY]);
    let up = vector_negate(&gravity);

    // if dead, fix the angle and don't add any kick
    if snap.ps.stats[STAT_HEALTH] <= 0 {
        cg.refdef_view_angles[ROLL] = 40.0;
        cg.refdef_view_angles[PITCH] = -15.0;
        cg.refdef_view_angles[YAW] = snap.ps.stats[STAT_DEAD_YAW] as f32;
        cg.refdef.vieworg = vector_ma(&cg.refdef.vieworg, ps.viewheight, &up);
        return;
    }

    // add angles based on weapon kick
    for i in 0..3 {
        cg.refdef_view_angles[i] += cg.kick_angles[i];
    }

    // add angles based on damage kick
    if cg.damage_time != 0 {
        let ratio = kick_ratio(
            cg.time - cg.damage_time,
            DAMAGE_DEFLECT_TIME,
            DAMAGE_RETURN_TIME,
        );
        cg.refdef_view_angles[PITCH] += ratio * cg.v_dmg_pitch;
        cg.refdef_view_angles[ROLL] += ratio * cg.v_dmg_roll;
    }

    // add angles based on velocity
    let (forward, right, _) = angle_vectors_tuple(&cg.refdef_view_angles);

    let delta = dot_product(&ps.velocity, &forward);
    cg.refdef_view_angles[PITCH] += delta * cgs.cvars.value(cgs.cg_run_pitch);

    let delta = dot_product(&ps.velocity, &right);
    cg.refdef_view_angles[ROLL] -= delta * cgs.cvars.value(cgs.cg_run_roll);

    // add angles based on bob

    // make sure the bob is visible even at low speeds
    let speed = if cg.xyspeed > 200.0 { cg.xyspeed } else { 200.0 };

    let mut delta = cg.bobfracsin * cgs.cvars.value(cgs.cg_bob_pitch) * speed;
    if ps.pm_flags & PMF_DUCKED != 0 {
        delta *= 3.0; // crouching
    }
    cg.refdef_view_angles[PITCH] += delta;
    let mut delta = cg.bobfracsin * cgs.cvars.value(cgs.cg_bob_roll) * speed;
    if ps.pm_flags & PMF_DUCKED != 0 {
        delta *= 3.0; // crouching accentuates roll
    }
    if cg.bobcycle & 1 != 0 {
        delta = -delta;
    }
    cg.refdef_view_angles[ROLL] += delta;

    //===================================

    // add view height
    cg.refdef.vieworg = vector_ma(&cg.refdef.vieworg, ps.viewheight, &up);

    // smooth out duck height changes
    let ratio = decay_ratio(cg.time - cg.duck_time, DUCK_TIME);
    if ratio > 0.0 {
        cg.refdef.vieworg = vector_ma(&cg.refdef.vieworg, cg.duck_change * ratio, &gravity);
    }

    // add bob height
    let mut bob = cg.bobfracsin * cg.xyspeed * cgs.cvars.value(cgs.cg_bob_up);
    if bob > 6.0 {
        bob = 6.0;
    }
    cg.refdef.vieworg = vector_ma(&cg.refdef.vieworg, bob, &up);

    // add fall height
    let ratio = kick_ratio(cg.time - cg.land_time, LAND_DEFLECT_TIME, LAND_RETURN_TIME);
    if ratio > 0.0 {
        cg.refdef.vieworg = vector_ma(&cg.refdef.vieworg, cg.land_change * ratio, &up);
    }

    // add step offset
    cg_step_offset(cg);

    // add kick offset
    cg.refdef.vieworg = vector_add(&cg.refdef.vieworg, &cg.kick_origin);
}

//======================================================================

// ============================================================
// CG_ZoomDown_f / CG_ZoomUp_f
// ============================================================

pub fn cg_zoom_down_f(cg: &mut CgState) {
    if cg.zoomed {
        return;
    }
    cg.zoomed = true;
    cg.zoom_time = cg.time;
}

pub fn cg_zoom_up_f(cg: &mut CgState) {
    if !cg.zoomed {
        return;
    }
    cg.zoomed = false;
    cg.zoom_time = cg.time;
}

// ============================================================
// CG_CalcFov
// ============================================================

/// Fixed fov at intermissions, otherwise account for fov variable and
/// zooms. Returns whether the eye is inside a liquid volume.
pub fn cg_calc_fov(
    cg: &mut CgState,
    cgs: &mut CgStatic,
    cm: &dyn CollisionModel,
    client: &dyn ClientSystem,
) -> bool {
    let mut fov_x: f32 = 90.0;
    let mut normal_fov = true;
    let mut sensitivity = 1.0f32;

    if cg.predicted_player_state.pm_type == PmType::Intermission || cg.rendering_third_person {
        // if in intermission, use a fixed value
        fov_x = 90.0;
        normal_fov = false;
    } else if let Some(snap) = cg.snap {
        // per-weapon toggled zoom, switched on the secondary attack edge
        if snap.ps.weapon == WP_RAILGUN {
            let cmd = client.user_cmd(client.current_cmd_number());

            if cmd.buttons & BUTTON_ATTACK2 != 0 && cg.last_buttons & BUTTON_ATTACK2 == 0 {
                cg.rail_zoom = !cg.rail_zoom;
            }
            cg.last_buttons = cmd.buttons;
        } else {
            cg.rail_zoom = false;
        }

        if snap.ps.persistant[PERS_TEAM] == cgs.team_info.marine_team {
            if cg.rail_zoom {
                fov_x = 30.0;
                sensitivity = 0.4;
            } else {
                fov_x = 90.0;
            }

            if cgs.cvars.integer(cgs.cg_fov) != fov_x as i32 {
                cgs.cvars.set_value(cgs.cg_fov, fov_x);
            }
            normal_fov = false;
        } else if snap.ps.persistant[PERS_TEAM] == cgs.team_info.alien_team {
            let race = (snap.ps.persistant[PERS_CLASS] & ALIEN_RACE_MASK) as usize;

            if cg.rail_zoom {
                fov_x = 30.0;
                sensitivity = 0.4;
            } else {
                fov_x = ALIEN_FOV[race] as f32;
            }

            if cgs.cvars.integer(cgs.cg_fov) != fov_x as i32 {
                cgs.cvars.set_value(cgs.cg_fov, fov_x);
            }
            normal_fov = false;
        }
    }

    if normal_fov {
        // user selectable
        if cgs.dmflags.contains(DmFlags::FIXED_FOV) {
            // dmflag to prevent wide fov for all clients
            fov_x = 90.0;
        } else {
            fov_x = cgs.cvars.value(cgs.cg_fov);
            if fov_x < 1.0 {
                fov_x = 1.0;
            } else if fov_x > 160.0 {
                fov_x = 160.0;
            }
        }

        // account for zooms
        let mut zoom_fov = cgs.cvars.value(cgs.cg_zoomfov);
        if zoom_fov < 1.0 {
            zoom_fov = 1.0;
        } else if zoom_fov > 160.0 {
            zoom_fov = 160.0;
        }

        let f = (cg.time - cg.zoom_time) as f32 / ZOOM_TIME;
        if cg.zoomed {
            if f > 1.0 {
                fov_x = zoom_fov;
            } else {
                fov_x += f * (zoom_fov - fov_x);
            }
        } else {
            // unzooming retraces the same curve from the zoom fov
            if f <= 1.0 {
                fov_x = zoom_fov + f * (fov_x - zoom_fov);
            }
        }
    }

    let x = cg.refdef.width as f32 / (fov_x / 360.0 * PI).tan();
    let mut fov_y = (cg.refdef.height as f32).atan2(x);
    fov_y = fov_y * 360.0 / PI;

    // warp if underwater
    let contents = cm.point_contents(&cg.refdef.vieworg);
    let inwater = contents & (CONTENTS_WATER | CONTENTS_SLIME | CONTENTS_LAVA) != 0;
    if inwater {
        let phase = cg.time as f32 / 1000.0 * WAVE_FREQUENCY * PI * 2.0;
        let v = WAVE_AMPLITUDE * phase.sin();
        fov_x += v;
        fov_y -= v;
    }

    // set it
    cg.refdef.fov_x = fov_x;
    cg.refdef.fov_y = fov_y;

    if !cg.zoomed {
        cg.zoom_sensitivity = sensitivity;
    } else {
        cg.zoom_sensitivity = cg.refdef.fov_y / 75.0;
    }

    inwater
}

// ============================================================
// CG_DamageBlendBlob
// ============================================================

pub fn cg_damage_blend_blob(cg: &CgState, cgs: &CgStatic, renderer: &mut dyn Renderer) {
    if cg.damage_value == 0.0 {
        return;
    }

    let max_time = DAMAGE_TIME;
    let t = cg.time - cg.damage_time;
    if t <= 0 || t >= max_time {
        return;
    }

    let mut ent = RefEntity::default();
    ent.re_type = RefEntityType::Sprite;
    ent.renderfx = RF_FIRST_PERSON;

    ent.origin = vector_ma(&cg.refdef.vieworg, 8.0, &cg.refdef.viewaxis[0]);
    ent.origin = vector_ma(&ent.origin, cg.damage_x * -8.0, &cg.refdef.viewaxis[1]);
    ent.origin = vector_ma(&ent.origin, cg.damage_y * 8.0, &cg.refdef.viewaxis[2]);

    ent.radius = cg.damage_value * 3.0;
    ent.custom_shader = cgs.media.view_blood_shader;
    ent.shader_rgba[0] = 255;
    ent.shader_rgba[1] = 255;
    ent.shader_rgba[2] = 255;
    ent.shader_rgba[3] = (200.0 * (1.0 - t as f32 / max_time as f32)) as u8;
    renderer.add_ref_entity(&ent);
}

// ============================================================
// CG_CalcViewValues
// ============================================================

/// Sets cg.refdef view values. Returns whether the eye is underwater.
pub fn cg_calc_view_values(
    cg: &mut CgState,
    cgs: &mut CgStatic,
    cm: &dyn CollisionModel,
    client: &dyn ClientSystem,
) -> bool {
    cg.refdef = RefDef::default();

    // calculate size of 3D view
    cg_calc_vrect(cg, cgs);

    let ps = cg.predicted_player_state;

    // intermission view
    if ps.pm_type == PmType::Intermission {
        cg.refdef.vieworg = ps.origin;
        cg.refdef_view_angles = ps.viewangles;
        angles_to_axis(&cg.refdef_view_angles, &mut cg.refdef.viewaxis);
        return cg_calc_fov(cg, cgs, cm, client);
    }

    cg.bobcycle = (ps.bob_cycle & 128) >> 7;
    cg.bobfracsin = ((ps.bob_cycle & 127) as f32 / 127.0 * PI).sin().abs();
    cg.xyspeed =
        (ps.velocity[0] * ps.velocity[0] + ps.velocity[1] * ps.velocity[1]).sqrt();

    cg.refdef.vieworg = ps.origin;
    cg.refdef_view_angles = ps.viewangles;

    // the orbiting camera advances the third person angle at a fixed rate
    if cgs.cvars.integer(cgs.cg_camera_orbit) != 0 {
        if cg.time > cg.next_orbit_time {
            cg.next_orbit_time = cg.time + cgs.cvars.integer(cgs.cg_camera_orbit_delay);
            let angle = cgs.cvars.value(cgs.cg_third_person_angle)
                + cgs.cvars.value(cgs.cg_camera_orbit);
            cgs.cvars.set_value(cgs.cg_third_person_angle, angle);
        }
    }

    // add error decay
    let decay = cgs.cvars.value(cgs.cg_error_decay);
    if decay > 0.0 {
        let t = cg.time - cg.predicted_error_time;
        let f = (decay - t as f32) / decay;
        if f > 0.0 && f < 1.0 {
            cg.refdef.vieworg = vector_ma(&cg.refdef.vieworg, f, &cg.predicted_error);
        } else {
            cg.predicted_error_time = 0;
        }
    }

    if cg.rendering_third_person {
        // back away from character
        cg_offset_third_person_view(cg, cgs, cm, client);
    } else {
        // offset for local bobbing and kicks
        cg_offset_first_person_view(cg, cgs);
    }

    // position eye relative to origin
    angles_to_axis(&cg.refdef_view_angles, &mut cg.refdef.viewaxis);

    let following = matches!(&cg.snap, Some(s) if s.ps.pm_flags & PMF_FOLLOW != 0);
    if !cg.rendering_third_person {
        if let ViewOrientation::QuaternionOverride(quat) =
            ViewOrientation::from_player_state(&ps)
        {
            quat_rotate_axis(&quat, &mut cg.refdef.viewaxis);
        }
    } else if !following || cgs.follow_mode == 1 {
        // align the external camera with the subject's gravity frame
        let gravity = gravity_from_stat(ps.stats[STAT_GRAVITY]);
        if !vector_compare(&gravity, &GRAVITY_DOWN) {
            let quat = quat_between(&GRAVITY_DOWN, &gravity);
            quat_rotate_axis(&quat, &mut cg.refdef.viewaxis);
        }
    }

    if cg.hyperspace {
        cg.refdef.rdflags |= RDF_NOWORLDMODEL | RDF_HYPERSPACE;
    }

    // field of view
    cg_calc_fov(cg, cgs, cm, client)
}

// ============================================================
// CG_PowerupTimerSounds
// ============================================================

fn cg_powerup_timer_sounds(cg: &CgState, cgs: &CgStatic, sound: &mut dyn SoundBackend) {
    let snap = match &cg.snap {
        Some(s) => s,
        None => return,
    };

    // powerup timers going away
    for i in 1..MAX_POWERUPS {
        let t = snap.ps.powerups[i];
        if t <= cg.time {
            continue;
        }
        if t - cg.time >= POWERUP_BLINKS * POWERUP_BLINK_TIME {
            continue;
        }
        if (t - cg.time) / POWERUP_BLINK_TIME != (t - cg.old_time) / POWERUP_BLINK_TIME {
            sound.start_sound(None, snap.ps.client_num, CHAN_ITEM, cgs.media.wear_off_sound);
        }
    }
}

// ============================================================
// CG_AddBufferedSound
// ============================================================

/// Queue a one-shot sound. When the ring is full the oldest unplayed
/// entry is dropped; producers are never blocked.
pub fn cg_add_buffered_sound(cg: &mut CgState, sfx: SfxHandle) {
    if sfx == 0 {
        return;
    }
    cg.sound_buffer[cg.sound_buffer_in % MAX_SOUNDBUFFER] = sfx;
    cg.sound_buffer_in += 1;
    if cg.sound_buffer_in - cg.sound_buffer_out > MAX_SOUNDBUFFER {
        cg.sound_buffer_out = cg.sound_buffer_in - MAX_SOUNDBUFFER;
    }
}

// ============================================================
// CG_PlayBufferedSounds
// ============================================================

fn cg_play_buffered_sounds(cg: &mut CgState, sound: &mut dyn SoundBackend) {
    if cg.sound_time < cg.time {
        if cg.sound_buffer_out < cg.sound_buffer_in {
            let slot = cg.sound_buffer_out % MAX_SOUNDBUFFER;
            let sfx = cg.sound_buffer[slot];
            cg.sound_buffer[slot] = 0;
            cg.sound_buffer_out += 1;
            sound.start_local_sound(sfx, CHAN_ANNOUNCER);
            cg.sound_time = cg.time + BUFFERED_SOUND_DELAY;
        }
    }
}

//=========================================================================

// ============================================================
// CG_DrawActiveFrame
// ============================================================

/// Generates and draws a game scene and status information at the given
/// time. Short-circuits to the information screen whenever no scene can
/// be produced yet.
pub fn cg_draw_active_frame(
    cg: &mut CgState,
    cgs: &mut CgStatic,
    renderer: &mut dyn Renderer,
    sound: &mut dyn SoundBackend,
    cm: &dyn CollisionModel,
    client: &mut dyn ClientSystem,
    scene: &mut dyn SceneAssembler,
    server_time: i32,
    stereo_view: StereoFrame,
    demo_playback: bool,
) {
    cg.time = server_time;
    cg.demo_playback = demo_playback;

    // update cvars
    cg_update_cvars(cgs);

    // if we are only updating the screen as a loading
    // pacifier, don't even try to read snapshots
    if !cg.info_screen_text.is_empty() {
        scene.draw_information();
        return;
    }

    // any looped sounds will be respecified as entities
    // are added to the render list
    sound.clear_looping_sounds();

    // clear all the render lists
    renderer.clear_scene();

    // set up cg.snap
    client.process_snapshots(cg);

    // if we haven't received any snapshots yet, all
    // we can draw is the information screen
    let snap = match &cg.snap {
        Some(s) if !s.snap_flags.contains(SnapFlags::NOT_ACTIVE) => *s,
        _ => {
            scene.draw_information();
            return;
        }
    };

    // let the client system know what our weapon and zoom settings are
    client.set_user_cmd_value(cg.weapon_select, cg.zoom_sensitivity);

    // this counter will be bumped for every valid scene we generate
    cg.client_frame += 1;

    // update cg.predicted_player_state
    client.predict_player_state(cg);

    // decide on third person view; the follow and spectator overrides
    // must not stick in the user's preference
    let saved_third_person = cgs.cvars.integer(cgs.cg_third_person);
    let mut third_person = saved_third_person;

    if snap.ps.pm_flags & PMF_FOLLOW != 0 {
        third_person = if cgs.follow_mode != 2 { 1 } else { 0 };
    } else if snap.ps.persistant[PERS_TEAM] == TEAM_SPECTATOR {
        third_person = 0;
    }

    cg.rendering_third_person = third_person != 0 || snap.ps.stats[STAT_HEALTH] <= 0;

    cgs.cvars.set_value(cgs.cg_third_person, saved_third_person as f32);
    cgs.cvars.clear_modified(cgs.cg_third_person);

    // build cg.refdef
    let inwater = cg_calc_view_values(cg, cgs, cm, client);

    if snap.ps.pm_type == PmType::Intermission
        || snap.ps.pm_flags & PMF_FOLLOW != 0
        || snap.ps.persistant[PERS_TEAM] == TEAM_SPECTATOR
    {
        cg.rail_zoom = false;
        cg.night_vision = false;
    }

    if cg.rendering_third_person {
        cg.rail_zoom = false;
    }

    // first person blend blobs, done after the axis is final
    if !cg.rendering_third_person {
        cg_damage_blend_blob(cg, cgs, renderer);
    }

    // build the render lists
    if !cg.hyperspace {
        scene.add_packet_entities(); // after CalcViewValues, so predicted player state is correct
        scene.add_marks();
        scene.add_particles();
        scene.add_local_entities();
        scene.add_view_weapon(&cg.predicted_player_state);
    }

    // add buffered sounds
    cg_play_buffered_sounds(cg, sound);

    // play buffered voice chats
    scene.play_buffered_voice_chats();

    // finish up the rest of the refdef
    if cg.test_model_entity.model != 0 {
        cg_add_test_model(cg, cgs, renderer);
    }
    cg.refdef.time = cg.time;
    cg.refdef.areamask = snap.areamask;

    // warning sounds when powerup is wearing off
    cg_powerup_timer_sounds(cg, cgs, sound);

    // update audio positions
    sound.respatialize(
        snap.ps.client_num,
        &cg.refdef.vieworg,
        &cg.refdef.viewaxis,
        inwater,
    );

    // make sure the frame timing isn't done twice when in stereo
    if stereo_view != StereoFrame::Right {
        cg.frametime = cg.time - cg.old_time;
        if cg.frametime < 0 {
            cg.frametime = 0;
        }
        cg.old_time = cg.time;
        scene.add_lagometer_frame_info(cg.frametime);
    }

    // fade the timescale toward its target
    let scale = cgs.cvars.value(cgs.timescale);
    let fade_end = cgs.cvars.value(cgs.cg_timescale_fade_end);
    let fade_speed = cgs.cvars.value(cgs.cg_timescale_fade_speed);
    if scale != fade_end && fade_speed != 0.0 {
        let step = fade_speed * cg.frametime as f32 / 1000.0;
        let faded = if scale < fade_end {
            (scale + step).min(fade_end)
        } else {
            (scale - step).max(fade_end)
        };
        cgs.cvars.set_value(cgs.timescale, faded);
    }

    // actually issue the rendering calls
    renderer.render_scene(&cg.refdef);

    if cgs.cvars.integer(cgs.cg_stats) != 0 {
        com_printf(&format!("cg.clientFrame:{}\n", cg.client_frame));
    }
}

// ============================================================
// Tests
// ============================================================

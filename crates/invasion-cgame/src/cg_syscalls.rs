// cg_syscalls.rs — seams to the systems the cgame calls out to
//
// The view pipeline never owns rendering, sound, collision, snapshots
// or raw input; it drives them through these traits. The embedding
// client supplies the implementations, tests supply mocks.

use invasion_common::q_shared::{Trace, UserCmd, Vec3};

use crate::cg_local::{CgState, ModelHandle, RefDef, RefEntity, SfxHandle};

/// Scene accumulation and frame submission.
pub trait Renderer {
    /// Drop all entities accumulated for the previous frame.
    fn clear_scene(&mut self);
    /// Returns 0 when the model is not available.
    fn register_model(&mut self, name: &str) -> ModelHandle;
    fn add_ref_entity(&mut self, ent: &RefEntity);
    /// Rasterize the frame described by `refdef` and the accumulated scene.
    fn render_scene(&mut self, refdef: &RefDef);
}

/// One-shot and positional sound playback.
pub trait SoundBackend {
    /// Looping sounds are respecified each frame as entities are added.
    fn clear_looping_sounds(&mut self);
    /// `origin` of None means the sound follows the entity.
    fn start_sound(&mut self, origin: Option<&Vec3>, entnum: i32, channel: i32, sfx: SfxHandle);
    fn start_local_sound(&mut self, sfx: SfxHandle, channel: i32);
    /// Reposition the listener with the final view basis.
    fn respatialize(&mut self, entnum: i32, origin: &Vec3, axis: &[Vec3; 3], inwater: bool);
}

/// Synchronous collision queries against the loaded map.
pub trait CollisionModel {
    fn box_trace(
        &self,
        start: &Vec3,
        mins: &Vec3,
        maxs: &Vec3,
        end: &Vec3,
        pass_entity_num: i32,
        content_mask: i32,
    ) -> Trace;
    fn point_contents(&self, point: &Vec3) -> i32;
}

/// Snapshot intake, movement prediction and raw input access.
pub trait ClientSystem {
    /// Advance cg.snap to the frame the client should render at.
    fn process_snapshots(&mut self, cg: &mut CgState);
    /// Fill cg.predicted_player_state (and the prediction error fields)
    /// from the latest snapshot plus pending user commands.
    fn predict_player_state(&mut self, cg: &mut CgState);
    fn current_cmd_number(&self) -> i32;
    fn user_cmd(&self, cmd_number: i32) -> UserCmd;
    /// Report the selected weapon and look-sensitivity scale back to the
    /// input layer.
    fn set_user_cmd_value(&mut self, weapon: i32, sensitivity_scale: f32);
}

/// The per-frame scene assembly steps that live outside the view core.
pub trait SceneAssembler {
    /// Loading pacifier, drawn when no scene can be produced.
    fn draw_information(&mut self);
    fn add_packet_entities(&mut self);
    fn add_marks(&mut self);
    fn add_particles(&mut self);
    fn add_local_entities(&mut self);
    fn add_view_weapon(&mut self, ps: &invasion_common::q_shared::PlayerState);
    fn play_buffered_voice_chats(&mut self);
    fn add_lagometer_frame_info(&mut self, frametime: i32);
}

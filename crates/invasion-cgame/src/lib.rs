#![allow(dead_code, unused_variables)]
#![allow(clippy::needless_return, clippy::too_many_arguments, clippy::collapsible_if,
         clippy::collapsible_else_if, clippy::field_reassign_with_default,
         clippy::manual_range_contains, clippy::single_match, clippy::comparison_chain,
         clippy::identity_op, clippy::float_cmp, clippy::needless_range_loop,
         clippy::manual_clamp)]

pub mod cg_local;
pub mod cg_syscalls;
pub mod cg_main;
pub mod cg_playerstate;
pub mod cg_view;

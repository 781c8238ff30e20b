/*!
 * Core Types
 * Common types used across the simulator
 */

/// Process ID type
pub type Pid = u32;

/// Count or offset measured in allocation units
pub type Units = usize;

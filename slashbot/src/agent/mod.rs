//! Agent patterns. Currently only the ReAct (Think → Act → Observe) loop.

pub mod react;

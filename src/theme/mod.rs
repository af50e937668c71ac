//! Colors shared by the HUD and the playfield drawing.

pub mod palette;

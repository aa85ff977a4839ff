pub mod extrude;

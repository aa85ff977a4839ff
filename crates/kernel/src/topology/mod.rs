pub mod brep;

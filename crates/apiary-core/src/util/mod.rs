pub mod cell_name;

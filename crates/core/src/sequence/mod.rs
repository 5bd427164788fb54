pub mod image_set;

pub mod excel_write;
pub mod export_read;
pub mod reading_read;
pub mod table_read;
pub mod text_write;

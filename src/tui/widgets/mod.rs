pub mod color;
pub mod confirm_delete;
pub mod editor;
pub mod status_bar;
pub mod task_list;

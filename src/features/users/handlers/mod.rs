pub mod user_handler;

pub use user_handler::{__path_get_user_info, __path_list_user_files, get_user_info, list_user_files};

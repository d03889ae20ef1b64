mod uploaded_file;

pub use uploaded_file::{FileUsage, NewUploadedFile, UploadedFile};

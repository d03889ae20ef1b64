mod user_dto;

pub use user_dto::{UserFileDto, UserFilesResponseDto, UserInfoDto, UserInfoResponseDto};

mod commands;
mod dto;
mod queries;
mod validation;

pub use commands::{CreateBookmaker, DeleteBookmaker, UpdateBookmaker, UploadBookmakerLogo};
pub use dto::{BookmakerDto, CreateBookmakerDto, UpdateBookmakerDto};
pub use queries::{GetBookmaker, GetBookmakerByName, ListBookmakers, SearchBookmakers};

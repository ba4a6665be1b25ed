use std::fmt;

use crate::application::core::ValidationErrors;

#[derive(Debug, Clone)]
pub enum TrakerError {
    Validation(ValidationErrors),
    Unauthorized(String),
    Conflict(String),
    NotFound(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    PhotoService(String),
    Serialization(String),
    FileOperation(String),
    Internal(String),
}

impl TrakerError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            TrakerError::Validation(_) => "E001",
            TrakerError::Unauthorized(_) => "E002",
            TrakerError::Conflict(_) => "E003",
            TrakerError::NotFound(_) => "E004",
            TrakerError::DatabaseConfig(_) => "E005",
            TrakerError::DatabaseConnection(_) => "E006",
            TrakerError::DatabaseOperation(_) => "E007",
            TrakerError::PhotoService(_) => "E008",
            TrakerError::Serialization(_) => "E009",
            TrakerError::FileOperation(_) => "E010",
            TrakerError::Internal(_) => "E011",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            TrakerError::Validation(_) => "Validation Error",
            TrakerError::Unauthorized(_) => "Unauthorized",
            TrakerError::Conflict(_) => "Conflict",
            TrakerError::NotFound(_) => "Resource Not Found",
            TrakerError::DatabaseConfig(_) => "Database Configuration Error",
            TrakerError::DatabaseConnection(_) => "Database Connection Error",
            TrakerError::DatabaseOperation(_) => "Database Operation Error",
            TrakerError::PhotoService(_) => "Photo Service Error",
            TrakerError::Serialization(_) => "Serialization Error",
            TrakerError::FileOperation(_) => "File Operation Error",
            TrakerError::Internal(_) => "Internal Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            TrakerError::Validation(_) => "One or more validation errors occurred.",
            TrakerError::Unauthorized(msg) => msg,
            TrakerError::Conflict(msg) => msg,
            TrakerError::NotFound(msg) => msg,
            TrakerError::DatabaseConfig(msg) => msg,
            TrakerError::DatabaseConnection(msg) => msg,
            TrakerError::DatabaseOperation(msg) => msg,
            TrakerError::PhotoService(msg) => msg,
            TrakerError::Serialization(msg) => msg,
            TrakerError::FileOperation(msg) => msg,
            TrakerError::Internal(msg) => msg,
        }
    }

    /// 格式化为彩色输出（用于启动失败等终端场景）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for TrakerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for TrakerError {}

// 便捷的构造函数
impl TrakerError {
    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        TrakerError::Unauthorized(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        TrakerError::Conflict(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        TrakerError::NotFound(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        TrakerError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        TrakerError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        TrakerError::DatabaseOperation(msg.into())
    }

    pub fn photo_service<T: Into<String>>(msg: T) -> Self {
        TrakerError::PhotoService(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        TrakerError::Serialization(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        TrakerError::FileOperation(msg.into())
    }

    pub fn internal<T: Into<String>>(msg: T) -> Self {
        TrakerError::Internal(msg.into())
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, TrakerError::Conflict(_))
    }
}

impl From<ValidationErrors> for TrakerError {
    fn from(errors: ValidationErrors) -> Self {
        TrakerError::Validation(errors)
    }
}

// 唯一约束冲突单独识别，handler 据此返回失败结果
impl From<sea_orm::DbErr> for TrakerError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(detail)) => {
                TrakerError::Conflict(detail)
            }
            _ => TrakerError::DatabaseOperation(err.to_string()),
        }
    }
}

impl From<std::io::Error> for TrakerError {
    fn from(err: std::io::Error) -> Self {
        TrakerError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for TrakerError {
    fn from(err: serde_json::Error) -> Self {
        TrakerError::Serialization(err.to_string())
    }
}

impl From<crate::security::password::PasswordError> for TrakerError {
    fn from(err: crate::security::password::PasswordError) -> Self {
        TrakerError::Internal(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TrakerError>;

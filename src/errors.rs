use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum SiteGlueError {
    Config(String),
    InvalidRule(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Validation(String),
    Unauthorized(String),
    Remote(String),
    Serialization(String),
    Template(String),
    Mail(String),
}

impl SiteGlueError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            SiteGlueError::Config(_) => "E001",
            SiteGlueError::InvalidRule(_) => "E002",
            SiteGlueError::DatabaseConnection(_) => "E003",
            SiteGlueError::DatabaseOperation(_) => "E004",
            SiteGlueError::FileOperation(_) => "E005",
            SiteGlueError::Validation(_) => "E006",
            SiteGlueError::Unauthorized(_) => "E007",
            SiteGlueError::Remote(_) => "E008",
            SiteGlueError::Serialization(_) => "E009",
            SiteGlueError::Template(_) => "E010",
            SiteGlueError::Mail(_) => "E011",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            SiteGlueError::Config(_) => "Configuration Error",
            SiteGlueError::InvalidRule(_) => "Invalid Rule",
            SiteGlueError::DatabaseConnection(_) => "Database Connection Error",
            SiteGlueError::DatabaseOperation(_) => "Database Operation Error",
            SiteGlueError::FileOperation(_) => "File Operation Error",
            SiteGlueError::Validation(_) => "Validation Error",
            SiteGlueError::Unauthorized(_) => "Unauthorized",
            SiteGlueError::Remote(_) => "Remote Service Error",
            SiteGlueError::Serialization(_) => "Serialization Error",
            SiteGlueError::Template(_) => "Template Error",
            SiteGlueError::Mail(_) => "Mail Delivery Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            SiteGlueError::Config(msg) => msg,
            SiteGlueError::InvalidRule(msg) => msg,
            SiteGlueError::DatabaseConnection(msg) => msg,
            SiteGlueError::DatabaseOperation(msg) => msg,
            SiteGlueError::FileOperation(msg) => msg,
            SiteGlueError::Validation(msg) => msg,
            SiteGlueError::Unauthorized(msg) => msg,
            SiteGlueError::Remote(msg) => msg,
            SiteGlueError::Serialization(msg) => msg,
            SiteGlueError::Template(msg) => msg,
            SiteGlueError::Mail(msg) => msg,
        }
    }

    /// HTTP status a handler answers with when this error reaches it
    pub fn http_status(&self) -> StatusCode {
        match self {
            SiteGlueError::Validation(_) => StatusCode::BAD_REQUEST,
            SiteGlueError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            SiteGlueError::Remote(_) => StatusCode::MISDIRECTED_REQUEST,
            SiteGlueError::Serialization(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
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

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for SiteGlueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for SiteGlueError {}

// 便捷的构造函数
impl SiteGlueError {
    pub fn config<T: Into<String>>(msg: T) -> Self {
        SiteGlueError::Config(msg.into())
    }

    pub fn invalid_rule<T: Into<String>>(msg: T) -> Self {
        SiteGlueError::InvalidRule(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        SiteGlueError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        SiteGlueError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        SiteGlueError::FileOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        SiteGlueError::Validation(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        SiteGlueError::Unauthorized(msg.into())
    }

    pub fn remote<T: Into<String>>(msg: T) -> Self {
        SiteGlueError::Remote(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        SiteGlueError::Serialization(msg.into())
    }

    pub fn template<T: Into<String>>(msg: T) -> Self {
        SiteGlueError::Template(msg.into())
    }

    pub fn mail<T: Into<String>>(msg: T) -> Self {
        SiteGlueError::Mail(msg.into())
    }
}

impl From<sea_orm::DbErr> for SiteGlueError {
    fn from(err: sea_orm::DbErr) -> Self {
        SiteGlueError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for SiteGlueError {
    fn from(err: std::io::Error) -> Self {
        SiteGlueError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for SiteGlueError {
    fn from(err: serde_json::Error) -> Self {
        SiteGlueError::Serialization(err.to_string())
    }
}

impl From<regex::Error> for SiteGlueError {
    fn from(err: regex::Error) -> Self {
        SiteGlueError::InvalidRule(err.to_string())
    }
}

impl From<handlebars::RenderError> for SiteGlueError {
    fn from(err: handlebars::RenderError) -> Self {
        SiteGlueError::Template(err.to_string())
    }
}

impl From<handlebars::TemplateError> for SiteGlueError {
    fn from(err: handlebars::TemplateError) -> Self {
        SiteGlueError::Template(err.to_string())
    }
}

impl From<toml::de::Error> for SiteGlueError {
    fn from(err: toml::de::Error) -> Self {
        SiteGlueError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SiteGlueError>;

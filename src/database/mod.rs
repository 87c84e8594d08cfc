//! 数据库模块：对外的统一查询门面
pub mod database;

// 导出核心接口
pub use self::database::{Database, create_database};

//! Domain primitives, aggregates, and use-case services.
//!
//! Purpose: Define strongly typed entities for the tracker and the services
//! that orchestrate them through repository ports. Entities enforce their
//! own invariants; services translate failures into [`Error`].
//!
//! Public surface:
//! - Error, ErrorCode: transport-agnostic failure payload.
//! - Value objects and identifiers (`UserId`, `Quantity`, `Deadline`, ...).
//! - Entities: `User`, `Task`, `Product`, `Category`, `TaskTemplate`,
//!   `ProductSet`, each with a `New*` draft and a `*Snapshot` persisted shape.
//! - Services: `TaskService`, `UserService`, `InventoryService`.

pub mod auth;
pub mod category;
pub mod error;
pub mod init_data;
pub mod inventory_service;
pub mod ports;
pub mod product;
pub mod product_set;
pub mod task;
pub mod task_service;
pub mod task_template;
pub mod user;
pub mod user_service;
pub mod value_objects;

pub use self::auth::{Authenticator, INIT_DATA_HEADER};
pub use self::category::{Category, CategoryChanges, CategoryError, CategorySnapshot, NewCategory};
pub use self::error::{Error, ErrorCode};
pub use self::init_data::{InitDataError, TelegramUser};
pub use self::inventory_service::InventoryService;
pub use self::product::{
    DEFAULT_LOW_STOCK_THRESHOLD, NewProduct, Product, ProductError, ProductSnapshot, ProductStatus,
};
pub use self::product_set::{NewProductSet, ProductSet, ProductSetError, ProductSetSnapshot};
pub use self::task::{NewTask, Task, TaskError, TaskPriority, TaskSnapshot, TaskStatus};
pub use self::task_service::TaskService;
pub use self::task_template::{
    NewTaskTemplate, Recurrence, TaskTemplate, TaskTemplateChanges, TaskTemplateError,
    TaskTemplateSnapshot,
};
pub use self::user::{Capabilities, NewUser, User, UserError, UserRole, UserSnapshot};
pub use self::user_service::UserService;
pub use self::value_objects::{
    Barcode, CategoryId, Comment, Deadline, PhotoUrl, ProductId, ProductSetId, Quantity, TaskId,
    TaskTemplateId, UserId, ValueObjectError,
};

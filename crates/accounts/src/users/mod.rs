//! User commands.

mod delete_user;

pub use delete_user::{
    CANNOT_DELETE_SELF_MESSAGE, DeleteUserCommand, DeleteUserHandler, user_not_found,
};

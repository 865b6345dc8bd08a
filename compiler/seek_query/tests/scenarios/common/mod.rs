//! Shared fixtures for scenario tests.

use seek_ir::FileId;
use seek_query::testing::{Fixture, FixtureError, Loaded};
use seek_sema::DefKind;

pub const USER_GO: &str = include_str!("../fixtures/user/user.go");
pub const EMAIL_GO: &str = include_str!("../fixtures/email/email.go");

/// The `user` package, type checked, with `app/email` loaded beside it.
pub struct UserPackage {
    pub loaded: Loaded,
    pub user: FileId,
    pub email: FileId,
}

/// Load `user/user.go` with every identifier resolved the way the Go type
/// checker resolves it.
pub fn user_package() -> Result<UserPackage, FixtureError> {
    let mut fx = Fixture::new("user");
    let user = fx.file("user/user.go", USER_GO)?;
    let email = fx.external_file("email/email.go", EMAIL_GO, "app/email")?;

    let string = fx.builtin("string", DefKind::TypeName);
    // The package name lives in the importing file, at the import path
    let email_pkg = fx.import(user, "app/email")?;
    let send = fx.def(email, "Send", 0, DefKind::Func)?;

    // `package user` names the package but declares no object
    fx.declaring(user, "user", 0)?;
    let user_type = fx.def(user, "User", 0, DefKind::TypeName)?;
    let name_field = fx.def(user, "Name", 0, DefKind::Field)?;
    let email_field = fx.def(user, "Email", 0, DefKind::Field)?;
    fx.def(user, "NewUser", 0, DefKind::Func)?;
    let name_param = fx.def(user, "name", 0, DefKind::Param)?;
    let email_param = fx.def(user, "email", 0, DefKind::Param)?;
    let receiver = fx.def(user, "u", 0, DefKind::Param)?;
    fx.def(user, "Welcome", 0, DefKind::Method)?;

    fx.refer_all(user, "string", string)?
        .refer_all(user, "User", user_type)?
        .refer_all(user, "Name", name_field)?
        .refer_all(user, "Email", email_field)?
        .refer_all(user, "name", name_param)?
        // `Email: email` is the parameter, `email.Send` the package
        .refer(user, "email", 1, email_param)?
        .refer(user, "email", 2, email_pkg)?
        .refer(user, "Send", 0, send)?
        .refer_all(user, "u", receiver)?;

    Ok(UserPackage {
        loaded: fx.build()?,
        user,
        email,
    })
}

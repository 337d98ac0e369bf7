pub mod change_password;
pub mod delete_account;
pub mod forgot_password;
pub mod login;
pub mod register;
pub mod reset_password;
pub mod two_factor;
pub mod verify_backup_code;
pub mod verify_email;
pub mod verify_otp;

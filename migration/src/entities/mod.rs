pub mod device_profile;
pub mod device_template;
pub mod user;

pub use device_profile::Entity as DeviceProfileEntity;
pub use device_template::Entity as DeviceTemplateEntity;
pub use user::Entity as UserEntity;

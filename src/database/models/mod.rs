pub mod booking;
pub mod configuration;
pub mod guide;
pub mod person;
pub mod property;
pub mod rbac;
pub mod sales_channel;
pub mod treasury;
pub mod user;

pub use booking::{Booking, BookingFilter, BookingInput, Movement, MovementInput};
pub use configuration::{ConfigurationType, ConfigurationValue, ConfigurationValueInput};
pub use guide::{Guide, GuideAccessRequest, GuideContent, GuideSection, GuideSummary};
pub use person::{Person, PersonFilter, PersonInput};
pub use property::{
    ClosedPeriod, ClosedPeriodInput, PricingPlan, PricingPlanInput, Property, PropertyHighlight,
    PropertyImage, PropertyImageInput, PropertyInput, PropertyReview, PublicProperty, SlugQuery,
};
pub use rbac::{Permission, Role, RoleInput, RolePermissionsInput, UserRolesInput};
pub use sales_channel::{SalesChannel, SalesChannelInput};
pub use treasury::{TreasuryAccount, TreasuryAccountInput};
pub use user::UserInfo;

pub mod company;
pub mod developer;
pub mod report;
pub mod team;
pub mod user;

pub use company::{Company, CompanyPatch, CreateCompanyRequest};
pub use developer::{ArchiveDeveloperRequest, CreateDeveloperRequest, Developer, DeveloperPatch};
pub use report::{CreatePerformanceReportRequest, PerformanceReport, PerformanceStats};
pub use team::{CreateTeamRequest, Team, TeamPatch};
pub use user::{
    ChangePasswordRequest, CreateUserRequest, InitAdminRequest, LoginRequest, Role,
    SetNewPasswordRequest, User, UserPatch,
};

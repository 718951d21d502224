#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    InvalidArguments = 2,
    DirectoryNotFound = 3,
    InvalidExclusion = 4,
    PlanConflict = 5,
    TargetExists = 6,
    PermissionError = 7,
    HistoryError = 8,
    RenameError = 9,
    Cancelled = 10,
    RollbackIncomplete = 11,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

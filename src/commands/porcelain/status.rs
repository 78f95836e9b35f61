use crate::areas::repository::Repository;
use crate::artifacts::status::status_info::{Status, StatusInfo};
use crate::errors::GitletResult;
use std::io::Write;

impl Repository {
    /// Report branches, staged changes and the state of the working directory
    pub fn status(&self) -> GitletResult<StatusInfo> {
        let status = Status::new(self).initialize()?;
        write!(self.writer(), "{status}")?;

        Ok(status)
    }
}

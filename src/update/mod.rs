// SPDX-License-Identifier: MPL-2.0

mod checker;
mod task;
mod version;

pub use checker::{
    GITHUB_REPO, UpdateChecker, UpdateError, newer_release, parse_release_tag, release_page_url,
};
pub use task::{CheckTrigger, UpdateReport, UpdateService};
pub use version::{ParseVersionError, ReleaseVersion};

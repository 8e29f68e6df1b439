//! Optional issue-tracker enrichment.
//!
//! An enriched employee carries the profile of the first tracker account
//! whose mail matches one of the employee's mail candidates, in preference
//! order. No match yields an empty profile; transport or authentication
//! failures are fatal.

pub mod jira;

use std::future::Future;

use tracing::debug;

use crate::errors::TrackerError;
use crate::models::{Employee, Profile};

pub use jira::JiraClient;

/// An issue-tracker account matched by mail address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub key: String,
    pub profile_url: String,
}

impl From<Account> for Profile {
    fn from(account: Account) -> Self {
        Profile::new(account.key, Some(account.profile_url))
    }
}

/// Account lookup by exact mail address.
pub trait AccountLookup {
    fn find_account_by_mail(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<Option<Account>, TrackerError>>;
}

/// Fill in the tracker profile of `employee`.
pub async fn enrich<T: AccountLookup>(
    mut employee: Employee,
    tracker: &T,
) -> Result<Employee, TrackerError> {
    let mut profile = Profile::default();

    for address in &employee.mail {
        if let Some(account) = tracker.find_account_by_mail(address).await? {
            debug!(address, key = %account.key, "matched issue tracker account");
            profile = account.into();
            break;
        }
    }

    if profile.is_empty() {
        debug!(user_id = %employee.user_id, "no issue tracker account matched");
    }
    employee.tracker_id = Some(profile);
    Ok(employee)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MockTracker {
        accounts: HashMap<String, Account>,
        fail: bool,
        queried: RefCell<Vec<String>>,
    }

    impl MockTracker {
        fn with_account(mut self, mail: &str, key: &str) -> Self {
            self.accounts.insert(
                mail.to_string(),
                Account {
                    key: key.to_string(),
                    profile_url: format!("https://issues.example.com/ViewProfile.jspa?name={key}"),
                },
            );
            self
        }
    }

    impl AccountLookup for MockTracker {
        async fn find_account_by_mail(
            &self,
            address: &str,
        ) -> Result<Option<Account>, TrackerError> {
            self.queried.borrow_mut().push(address.to_string());
            if self.fail {
                return Err(TrackerError::AuthenticationFailed("HTTP 401".into()));
            }
            Ok(self.accounts.get(address).cloned())
        }
    }

    fn employee(mail: &[&str]) -> Employee {
        Employee {
            user_id: Profile::plain("jdoe"),
            mail: mail.iter().map(|m| m.to_string()).collect(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_first_matching_candidate_wins() {
        let tracker = MockTracker::default()
            .with_account("alias@x", "JDOE-1")
            .with_account("primary@x", "JDOE-2");

        let e = enrich(employee(&["alias@x", "primary@x"]), &tracker)
            .await
            .unwrap();
        let profile = e.tracker_id.unwrap();
        assert_eq!(profile.text, "JDOE-1");
        assert!(profile.link.unwrap().ends_with("name=JDOE-1"));
        assert_eq!(*tracker.queried.borrow(), vec!["alias@x".to_string()]);
    }

    #[tokio::test]
    async fn test_falls_through_to_later_candidates() {
        let tracker = MockTracker::default().with_account("primary@x", "JDOE-2");

        let e = enrich(employee(&["alias@x", "primary@x"]), &tracker)
            .await
            .unwrap();
        assert_eq!(e.tracker_id.unwrap().text, "JDOE-2");
        assert_eq!(tracker.queried.borrow().len(), 2);
    }

    #[tokio::test]
    async fn test_no_match_is_empty_profile() {
        let tracker = MockTracker::default();
        let e = enrich(employee(&["nobody@x"]), &tracker).await.unwrap();
        assert_eq!(e.tracker_id, Some(Profile::default()));

        let e = enrich(Employee::default(), &tracker).await.unwrap();
        assert_eq!(e.tracker_id, Some(Profile::default()));
    }

    #[tokio::test]
    async fn test_transport_failure_is_fatal() {
        let tracker = MockTracker {
            fail: true,
            ..Default::default()
        };
        let result = enrich(employee(&["alias@x"]), &tracker).await;
        assert!(matches!(result, Err(TrackerError::AuthenticationFailed(_))));
    }
}

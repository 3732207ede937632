//! Authorizer identity keying used by topic ownership.

use crate::authorization::chain::TopicAuthorizer;
use std::fmt::{Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AuthorizerIdentityKey {
    authorizer: Arc<dyn TopicAuthorizer>,
}

impl AuthorizerIdentityKey {
    pub(crate) fn new(authorizer: Arc<dyn TopicAuthorizer>) -> Self {
        Self { authorizer }
    }

    pub(crate) fn authorizer(&self) -> &Arc<dyn TopicAuthorizer> {
        &self.authorizer
    }

    pub(crate) fn name(&self) -> &str {
        self.authorizer.name()
    }

    // Vtable pointers are not stable across codegen units, so only the data
    // pointer takes part in identity.
    fn address(&self) -> *const () {
        Arc::as_ptr(&self.authorizer) as *const ()
    }
}

impl Hash for AuthorizerIdentityKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address().hash(state);
    }
}

impl PartialEq for AuthorizerIdentityKey {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.address(), other.address())
    }
}

impl Eq for AuthorizerIdentityKey {}

impl Debug for AuthorizerIdentityKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizerIdentityKey")
            .field("name", &self.name())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::AuthorizerIdentityKey;
    use crate::authorization::chain::{AuthorizationDecision, Operation, TopicAuthorizer};
    use crate::control_plane::connection::Connection;
    use crate::routing::topic::Topic;
    use std::collections::HashSet;
    use std::sync::Arc;

    struct Named(&'static str);

    impl TopicAuthorizer for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn decide(&self, _: &Connection, _: &Topic, _: Operation) -> AuthorizationDecision {
            AuthorizationDecision::NoOpinion
        }
    }

    #[test]
    fn identity_follows_allocation_not_name() {
        let shared: Arc<dyn TopicAuthorizer> = Arc::new(Named("same"));
        let other: Arc<dyn TopicAuthorizer> = Arc::new(Named("same"));

        let a = AuthorizerIdentityKey::new(shared.clone());
        let b = AuthorizerIdentityKey::new(shared);
        let c = AuthorizerIdentityKey::new(other);

        assert_eq!(a, b);
        assert_ne!(a, c);

        let keys: HashSet<AuthorizerIdentityKey> = [a, b, c].into_iter().collect();
        assert_eq!(keys.len(), 2);
    }
}

//! OAuth2 API client
//!
//! Entry point for the current (`/api/v1`) API: token grants, profiles,
//! paginated and saved-search listings, and the small resource lists.

use crate::auth::{AccessToken, AuthMode, Authenticator, Grant, DEFAULT_SCOPE};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::{HttpClient, Transport};
use crate::pagination::{
    fetch, PageRequest, PageSource, ProfilePage, SearchHandle, MAX_PAGE_SIZE,
};
use crate::profile::Profile;
use crate::resources::{
    Country, CountryList, Event, EventList, Group, GroupList, MemberStatus, MemberStatusList,
    MemberType, MemberTypeList, ResourceList,
};
use crate::types::Flavor;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

/// OAuth2 token endpoint
pub const TOKEN_PATH: &str = "/oauth/v1/token";

const PROFILE_PATH: &str = "/api/v1/profile";
const ME_PATH: &str = "/api/v1/profile/me";
const SEARCH_PATH: &str = "/api/v1/profile/search";

/// Client for the OAuth2-protected JSON API
///
/// Clones share the transport and the stored access token.
#[derive(Debug, Clone)]
pub struct Client {
    http: HttpClient,
}

impl Client {
    /// Client on the shared default transport
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = HttpClient::new(
            config.endpoint(),
            Flavor::Current,
            Authenticator::new(config.auth_config()),
        )?;
        Self::configured(http, config)
    }

    /// Client on an injected transport
    pub fn with_transport(config: &ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;
        let http = HttpClient::with_transport(
            config.endpoint(),
            Flavor::Current,
            Authenticator::new(config.auth_config()),
            transport,
        )?;
        Self::configured(http, config)
    }

    /// Client configured from `MEMBERCLICKS_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(&ClientConfig::from_env()?)
    }

    fn configured(http: HttpClient, config: &ClientConfig) -> Result<Self> {
        let mut http = http.with_timeout(config.timeout());
        if let Some(agent) = &config.user_agent {
            http = http.with_user_agent(agent)?;
        }
        Ok(Self { http })
    }

    /// Underlying codec, for endpoints without a typed wrapper
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// A view of this client with a different request timeout
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            http: self.http.clone().with_timeout(timeout),
        }
    }

    // ========================================================================
    // Tokens
    // ========================================================================

    /// The stored access token, if a grant has succeeded
    pub async fn access_token(&self) -> Option<AccessToken> {
        self.http.authenticator().access_token().await
    }

    /// Store a token obtained elsewhere
    pub async fn set_access_token(&self, token: AccessToken) {
        self.http.authenticator().store_access_token(token).await;
    }

    /// Client-credentials grant with the default scope
    pub async fn auth(&self) -> Result<AccessToken> {
        self.client_credentials(DEFAULT_SCOPE).await
    }

    pub async fn client_credentials(&self, scope: &str) -> Result<AccessToken> {
        self.grant(Grant::ClientCredentials {
            scope: scope.to_string(),
        })
        .await
    }

    /// Resource-owner password grant
    pub async fn owner_password(
        &self,
        scope: &str,
        username: &str,
        password: &str,
    ) -> Result<AccessToken> {
        self.grant(Grant::Password {
            scope: scope.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        })
        .await
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> Result<AccessToken> {
        self.grant(Grant::RefreshToken {
            refresh_token: refresh_token.to_string(),
        })
        .await
    }

    pub async fn authorization_code(
        &self,
        code: &str,
        scope: &str,
        state: &str,
        redirect_uri: &str,
    ) -> Result<AccessToken> {
        self.grant(Grant::AuthorizationCode {
            code: code.to_string(),
            scope: scope.to_string(),
            state: state.to_string(),
            redirect_uri: redirect_uri.to_string(),
        })
        .await
    }

    /// POST a grant to the token endpoint and store the token it returns
    async fn grant(&self, grant: Grant) -> Result<AccessToken> {
        let token: AccessToken = self
            .http
            .post_form(TOKEN_PATH, grant.form(), &AuthMode::Basic)
            .await?;
        self.set_access_token(token.clone()).await;
        Ok(token)
    }

    // ========================================================================
    // Profiles
    // ========================================================================

    /// Profile of the user `access_token` belongs to
    pub async fn me(&self, access_token: &str) -> Result<Profile> {
        let request = self.http.get_request(ME_PATH)?;
        self.http
            .send(request, &AuthMode::Bearer(access_token.to_string()))
            .await
    }

    /// A single profile by id
    pub async fn profile(&self, id: impl Display) -> Result<Profile> {
        self.http.get(&format!("{PROFILE_PATH}/{id}")).await
    }

    /// One page of profiles, or every profile when `page < 1`.
    ///
    /// `page_size` is clamped into `[10, 100]`. Aggregation always uses
    /// pages of 100.
    pub async fn profiles(&self, page: i64, page_size: i64) -> Result<ProfilePage> {
        let source = ProfilePages {
            http: &self.http,
            search_id: None,
        };
        fetch(&source, PageRequest::from_args(page, page_size)).await
    }

    /// Number of pages the tenant's profiles span at `page_size`
    pub async fn profile_page_count(&self, page_size: i64) -> Result<i64> {
        let page = self.profiles(1, page_size).await?;
        Ok(page.total_page_count)
    }

    /// One page of a saved search, or all of it when `page < 1`
    pub async fn profile_search(&self, search_id: &str, page: i64) -> Result<ProfilePage> {
        let source = ProfilePages {
            http: &self.http,
            search_id: Some(search_id),
        };
        let request = if page < 1 {
            PageRequest::All
        } else {
            PageRequest::Page {
                number: u32::try_from(page).unwrap_or(u32::MAX),
                size: MAX_PAGE_SIZE,
            }
        };
        fetch(&source, request).await
    }

    /// Create a saved search from caller-supplied criteria
    pub async fn create_profile_search<C: Serialize + ?Sized>(
        &self,
        criteria: &C,
    ) -> Result<SearchHandle> {
        self.http.post_json(SEARCH_PATH, criteria).await
    }

    /// First page of results for a saved search handle
    pub async fn fetch_search(&self, handle: &SearchHandle) -> Result<ProfilePage> {
        if handle.profiles_url.is_empty() {
            return self.profile_search(&handle.id, 1).await;
        }
        self.http.get(&handle.profiles_url).await
    }

    // ========================================================================
    // Resources
    // ========================================================================

    /// GET any un-paginated resource list
    pub async fn list<L: ResourceList>(&self) -> Result<Vec<L::Item>> {
        Ok(self.http.get::<L>(L::PATH).await?.into_items())
    }

    pub async fn events(&self) -> Result<Vec<Event>> {
        self.list::<EventList>().await
    }

    pub async fn groups(&self) -> Result<Vec<Group>> {
        self.list::<GroupList>().await
    }

    pub async fn countries(&self) -> Result<Vec<Country>> {
        self.list::<CountryList>().await
    }

    pub async fn member_types(&self) -> Result<Vec<MemberType>> {
        self.list::<MemberTypeList>().await
    }

    pub async fn member_statuses(&self) -> Result<Vec<MemberStatus>> {
        self.list::<MemberStatusList>().await
    }
}

/// `/api/v1/profile` pages, optionally scoped to a saved search
struct ProfilePages<'a> {
    http: &'a HttpClient,
    search_id: Option<&'a str>,
}

#[async_trait]
impl PageSource for ProfilePages<'_> {
    async fn fetch_page(&self, page: u32, page_size: u32) -> Result<ProfilePage> {
        let uri = match self.search_id {
            Some(id) => {
                let id: String = url::form_urlencoded::byte_serialize(id.as_bytes()).collect();
                format!("{PROFILE_PATH}?searchId={id}&pageSize={page_size}&pageNumber={page}")
            }
            None => format!("{PROFILE_PATH}?pageNumber={page}&pageSize={page_size}"),
        };
        self.http.get(&uri).await
    }
}

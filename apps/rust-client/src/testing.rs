// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Test doubles: an in-process marketplace backend and a scripted wallet.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::broadcast;

use crate::{
    blockchain::{signing::recover_signer, NetworkConfig},
    config::ClientConfig,
    models::{AuthResponse, ListNftRequest, LoginRequest, Nft, NftIdRequest, NftStatus, NonceResponse, User},
    state::AppState,
    storage::MemoryTokenStore,
    wallet::provider::{ProviderError, ProviderEvent, WalletProvider},
};

// =============================================================================
// Fake backend
// =============================================================================

/// Upload as received by the fake backend.
#[derive(Debug, Clone, Default)]
pub struct ReceivedUpload {
    pub title: String,
    pub description: String,
    pub category: String,
    pub file_name: String,
    pub content_type: String,
    pub size: usize,
    pub authorization: Option<String>,
}

/// Mutable state behind the fake backend.
#[derive(Debug, Default)]
pub struct BackendState {
    /// `"METHOD /path"` for every request, in arrival order.
    pub calls: Vec<String>,
    pub users: HashMap<String, User>,
    pub nonces: HashMap<String, String>,
    pub nfts: BTreeMap<u64, Nft>,
    pub sessions: HashMap<String, u64>,
    pub uploads: Vec<ReceivedUpload>,
    /// Recover the signer on login and compare with the address.
    pub verify_signatures: bool,
    /// Canned nonce reply, bypassing nonce generation.
    pub nonce_reply: Option<NonceResponse>,
    /// Canned login reply, bypassing verification.
    pub login_reply: Option<AuthResponse>,
    /// Forced failures keyed by `"METHOD /path"` (path without `/api`).
    pub failures: HashMap<String, (u16, Option<String>)>,
    pub token_price: f64,
    counter: u64,
}

impl BackendState {
    pub fn new() -> Self {
        Self {
            verify_signatures: true,
            token_price: 0.25,
            ..Self::default()
        }
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.users.insert(user.address.to_ascii_lowercase(), user);
        self
    }

    pub fn with_nft(mut self, nft: Nft) -> Self {
        self.nfts.insert(nft.id, nft);
        self
    }

    /// Register a bearer token for `user_id` without a login round trip.
    pub fn with_session(mut self, token: &str, user_id: u64) -> Self {
        self.sessions.insert(token.to_string(), user_id);
        self
    }

    /// Answer every nonce and login request with canned replies.
    pub fn with_replies(mut self, nonce: NonceResponse, login: AuthResponse) -> Self {
        self.nonce_reply = Some(nonce);
        self.login_reply = Some(login);
        self
    }

    pub fn fail(mut self, route: &str, status: u16, message: Option<&str>) -> Self {
        self.failures
            .insert(route.to_string(), (status, message.map(str::to_string)));
        self
    }

    fn next(&mut self) -> u64 {
        self.counter += 1;
        self.counter
    }
}

type Shared = Arc<Mutex<BackendState>>;
type Reply = (StatusCode, Json<Value>);

fn ok(value: Value) -> Reply {
    (StatusCode::OK, Json(value))
}

fn error(status: u16, message: &str) -> Reply {
    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(json!({ "error": message })),
    )
}

/// Record the call and return a forced failure if one is configured.
fn record(state: &mut BackendState, route: String) -> Option<Reply> {
    state.calls.push(route.clone());
    state.failures.get(&route).map(|(status, message)| match message {
        Some(message) => error(*status, message),
        None => (
            StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Json(json!({})),
        ),
    })
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn authenticate(state: &BackendState, headers: &HeaderMap) -> Result<u64, Reply> {
    bearer(headers)
        .and_then(|token| state.sessions.get(&token).copied())
        .ok_or_else(|| error(401, "User not authenticated"))
}

fn nft_json(nft: &Nft) -> Value {
    serde_json::to_value(nft).unwrap_or(Value::Null)
}

#[derive(Deserialize)]
struct NonceQuery {
    address: String,
}

async fn nonce(State(shared): State<Shared>, Query(query): Query<NonceQuery>) -> Reply {
    let mut state = shared.lock().unwrap();
    if let Some(reply) = record(&mut state, "GET /auth/nonce".into()) {
        return reply;
    }
    if let Some(reply) = state.nonce_reply.clone() {
        state.nonces.insert(query.address.to_ascii_lowercase(), reply.nonce.clone());
        return ok(json!(reply));
    }

    let nonce = format!("{:064x}", state.next());
    let key = query.address.to_ascii_lowercase();
    let exists = state.users.contains_key(&key);
    let message = if exists {
        format!("Please sign this message to login: {nonce}")
    } else {
        format!("Please sign this message to verify your ownership of this address: {nonce}")
    };
    state.nonces.insert(key, nonce.clone());
    ok(json!({ "nonce": nonce, "message": message, "exists": exists }))
}

async fn login(State(shared): State<Shared>, Json(request): Json<LoginRequest>) -> Reply {
    let mut state = shared.lock().unwrap();
    if let Some(reply) = record(&mut state, "POST /auth/login".into()) {
        return reply;
    }
    if let Some(reply) = state.login_reply.clone() {
        state.sessions.insert(reply.token.clone(), reply.user.id);
        return ok(json!(reply));
    }

    let key = request.address.to_ascii_lowercase();
    if state.nonces.remove(&key).as_deref() != Some(request.nonce.as_str()) {
        return error(401, "Invalid nonce");
    }
    if state.verify_signatures {
        let message = format!("Please sign this message to login: {}", request.nonce);
        match recover_signer(&message, &request.signature) {
            Ok(signer) if signer.to_string().eq_ignore_ascii_case(&request.address) => {}
            _ => return error(401, "Invalid signature"),
        }
    }
    let Some(user) = state.users.get(&key).cloned() else {
        return error(401, "User not found");
    };

    let token = format!("token-{}-{}", user.id, state.next());
    state.sessions.insert(token.clone(), user.id);
    ok(json!({ "message": "Login successful", "token": token, "user": user }))
}

async fn get_nft(State(shared): State<Shared>, Path(id): Path<u64>) -> Reply {
    let mut state = shared.lock().unwrap();
    if let Some(reply) = record(&mut state, format!("GET /nfts/{id}")) {
        return reply;
    }
    match state.nfts.get(&id) {
        Some(nft) => ok(nft_json(nft)),
        None => error(404, "NFT not found"),
    }
}

async fn list_nfts(
    State(shared): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Reply {
    let mut state = shared.lock().unwrap();
    if let Some(reply) = record(&mut state, "GET /nfts".into()) {
        return reply;
    }
    let page: usize = query.get("page").and_then(|v| v.parse().ok()).unwrap_or(1);
    let limit: usize = query.get("limit").and_then(|v| v.parse().ok()).unwrap_or(20);
    let min: Option<f64> = query.get("minPrice").and_then(|v| v.parse().ok());
    let max: Option<f64> = query.get("maxPrice").and_then(|v| v.parse().ok());

    let items: Vec<Value> = state
        .nfts
        .values()
        .filter(|nft| query.get("category").is_none_or(|c| &nft.category == c))
        .filter(|nft| min.is_none_or(|m| nft.price.unwrap_or(0.0) >= m))
        .filter(|nft| max.is_none_or(|m| nft.price.unwrap_or(0.0) <= m))
        .skip(page.saturating_sub(1) * limit)
        .take(limit)
        .map(nft_json)
        .collect();
    ok(Value::Array(items))
}

async fn user_nfts(State(shared): State<Shared>, headers: HeaderMap) -> Reply {
    let mut state = shared.lock().unwrap();
    if let Some(reply) = record(&mut state, "GET /user/nfts".into()) {
        return reply;
    }
    let user_id = match authenticate(&state, &headers) {
        Ok(id) => id,
        Err(reply) => return reply,
    };
    let items: Vec<Value> = state
        .nfts
        .values()
        .filter(|nft| nft.owner_id == user_id)
        .map(nft_json)
        .collect();
    ok(Value::Array(items))
}

async fn token_price(State(shared): State<Shared>) -> Reply {
    let mut state = shared.lock().unwrap();
    if let Some(reply) = record(&mut state, "GET /token/price".into()) {
        return reply;
    }
    ok(json!({ "price": state.token_price }))
}

async fn upload(
    State(shared): State<Shared>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Reply {
    let mut received = ReceivedUpload {
        authorization: bearer(&headers),
        ..ReceivedUpload::default()
    };
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                received.file_name = field.file_name().unwrap_or_default().to_string();
                received.content_type = field.content_type().unwrap_or_default().to_string();
                received.size = field.bytes().await.map(|b| b.len()).unwrap_or(0);
            }
            "title" => received.title = field.text().await.unwrap_or_default(),
            "description" => received.description = field.text().await.unwrap_or_default(),
            "category" => received.category = field.text().await.unwrap_or_default(),
            _ => {}
        }
    }

    let mut state = shared.lock().unwrap();
    if let Some(reply) = record(&mut state, "POST /nfts/upload".into()) {
        return reply;
    }
    let user_id = match authenticate(&state, &headers) {
        Ok(id) => id,
        Err(reply) => return reply,
    };
    let id = 100 + state.next();
    let nft = Nft {
        id,
        title: received.title.clone(),
        description: received.description.clone(),
        category: received.category.clone(),
        image_url: format!("https://cdn.example/{}", received.file_name),
        metadata_url: format!("ipfs://meta/{id}"),
        status: NftStatus::Uploaded,
        price: None,
        creator_id: user_id,
        owner_id: user_id,
        token_id: None,
        creator: None,
        owner: None,
        tx_hash: None,
        created_at: None,
    };
    state.nfts.insert(id, nft);
    state.uploads.push(received);
    (
        StatusCode::CREATED,
        Json(json!({ "id": id, "message": "NFT uploaded successfully" })),
    )
}

async fn mint(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Json(request): Json<NftIdRequest>,
) -> Reply {
    let mut state = shared.lock().unwrap();
    if let Some(reply) = record(&mut state, "POST /nfts/mint".into()) {
        return reply;
    }
    let user_id = match authenticate(&state, &headers) {
        Ok(id) => id,
        Err(reply) => return reply,
    };
    let serial = state.next();
    let Some(nft) = state.nfts.get_mut(&request.nft_id) else {
        return error(404, "NFT not found");
    };
    if nft.creator_id != user_id {
        return error(403, "Only the creator can mint this NFT");
    }
    if nft.status != NftStatus::Uploaded {
        return error(400, "NFT is already minted or listed");
    }
    nft.status = NftStatus::Minted;
    nft.token_id = Some(serial.to_string());
    let body = json!({ "message": "NFT minted successfully", "nft": nft_json(nft) });
    ok(body)
}

async fn list_for_sale(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Json(request): Json<ListNftRequest>,
) -> Reply {
    let mut state = shared.lock().unwrap();
    if let Some(reply) = record(&mut state, "POST /nfts/list".into()) {
        return reply;
    }
    let user_id = match authenticate(&state, &headers) {
        Ok(id) => id,
        Err(reply) => return reply,
    };
    let Some(nft) = state.nfts.get_mut(&request.nft_id) else {
        return error(404, "NFT not found");
    };
    if nft.owner_id != user_id {
        return error(403, "Only the owner can list this NFT");
    }
    if nft.status != NftStatus::Minted {
        return error(400, "NFT must be minted before listing");
    }
    nft.status = NftStatus::Listed;
    nft.price = Some(request.price);
    let body = json!({ "message": "NFT listed successfully", "nft": nft_json(nft) });
    ok(body)
}

async fn buy(
    State(shared): State<Shared>,
    headers: HeaderMap,
    Json(request): Json<NftIdRequest>,
) -> Reply {
    let mut state = shared.lock().unwrap();
    if let Some(reply) = record(&mut state, "POST /nfts/buy".into()) {
        return reply;
    }
    let user_id = match authenticate(&state, &headers) {
        Ok(id) => id,
        Err(reply) => return reply,
    };
    let Some(nft) = state.nfts.get_mut(&request.nft_id) else {
        return error(404, "NFT not found");
    };
    if nft.status != NftStatus::Listed {
        return error(400, "NFT is not listed for sale");
    }
    if nft.owner_id == user_id {
        return error(400, "You cannot buy your own NFT");
    }
    nft.owner_id = user_id;
    nft.status = NftStatus::Owned;
    let body = json!({ "message": "NFT purchased successfully", "nft": nft_json(nft) });
    ok(body)
}

/// Marketplace backend served on an ephemeral local port.
pub struct FakeBackend {
    pub base_url: url::Url,
    state: Shared,
}

impl FakeBackend {
    pub async fn start(state: BackendState) -> Self {
        let shared: Shared = Arc::new(Mutex::new(state));
        let routes = Router::new()
            .route("/auth/nonce", get(nonce))
            .route("/auth/login", post(login))
            .route("/nfts", get(list_nfts))
            .route("/nfts/upload", post(upload))
            .route("/nfts/mint", post(mint))
            .route("/nfts/list", post(list_for_sale))
            .route("/nfts/buy", post(buy))
            .route("/nfts/{id}", get(get_nft))
            .route("/user/nfts", get(user_nfts))
            .route("/token/price", get(token_price))
            .with_state(shared.clone());
        let app = Router::new().nest("/api", routes);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake backend");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: url::Url::parse(&format!("http://{addr}/api")).expect("base url"),
            state: shared,
        }
    }

    /// Requests received so far.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn nft(&self, id: u64) -> Option<Nft> {
        self.state.lock().unwrap().nfts.get(&id).cloned()
    }

    pub fn uploads(&self) -> Vec<ReceivedUpload> {
        self.state.lock().unwrap().uploads.clone()
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&mut BackendState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    /// Client configuration pointing at this backend.
    pub fn config(&self) -> ClientConfig {
        ClientConfig {
            api_url: self.base_url.clone(),
            redirect_delay: std::time::Duration::from_millis(10),
            ..ClientConfig::default()
        }
    }

    /// Application state with in-memory token storage.
    pub fn app_state(&self) -> AppState {
        AppState::new(self.config(), Arc::new(MemoryTokenStore::new())).expect("app state")
    }
}

// =============================================================================
// Fixtures
// =============================================================================

pub const ALICE: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
pub const BOB: &str = "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC";

pub fn user(id: u64, address: &str, username: &str) -> User {
    User {
        id,
        address: address.to_string(),
        username: username.to_string(),
        ..User::default()
    }
}

pub fn nft(id: u64, owner_id: u64, status: NftStatus) -> Nft {
    Nft {
        id,
        title: format!("Piece #{id}"),
        description: "Test artwork".to_string(),
        category: "Art".to_string(),
        image_url: format!("https://cdn.example/{id}.png"),
        metadata_url: format!("ipfs://meta/{id}"),
        status,
        price: (status == NftStatus::Listed).then_some(1.5),
        creator_id: owner_id,
        owner_id,
        token_id: None,
        creator: None,
        owner: None,
        tx_hash: None,
        created_at: None,
    }
}

// =============================================================================
// Scripted wallet provider
// =============================================================================

/// Wallet provider whose every answer is set by the test.
pub struct ScriptedProvider {
    pub accounts: Mutex<Result<Vec<String>, ProviderError>>,
    pub chain_id: Mutex<u64>,
    pub known_chains: Mutex<HashSet<u64>>,
    pub switch_error: Mutex<Option<ProviderError>>,
    pub add_error: Mutex<Option<ProviderError>>,
    pub signature: Mutex<Result<String, ProviderError>>,
    calls: Mutex<Vec<String>>,
    events: broadcast::Sender<ProviderEvent>,
}

impl ScriptedProvider {
    pub fn new(address: &str, chain_id: u64) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            accounts: Mutex::new(Ok(vec![address.to_string()])),
            chain_id: Mutex::new(chain_id),
            known_chains: Mutex::new(HashSet::from([chain_id])),
            switch_error: Mutex::new(None),
            add_error: Mutex::new(None),
            signature: Mutex::new(Ok("0xsig".to_string())),
            calls: Mutex::new(Vec::new()),
            events,
        }
    }

    pub fn emit(&self, event: ProviderEvent) {
        let _ = self.events.send(event);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn log(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl WalletProvider for ScriptedProvider {
    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
        self.log("eth_requestAccounts".into());
        self.accounts.lock().unwrap().clone()
    }

    async fn chain_id(&self) -> Result<u64, ProviderError> {
        self.log("eth_chainId".into());
        Ok(*self.chain_id.lock().unwrap())
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), ProviderError> {
        self.log(format!("wallet_switchEthereumChain {chain_id:#x}"));
        if let Some(err) = self.switch_error.lock().unwrap().clone() {
            return Err(err);
        }
        if !self.known_chains.lock().unwrap().contains(&chain_id) {
            return Err(ProviderError::UnrecognizedChain(chain_id));
        }
        *self.chain_id.lock().unwrap() = chain_id;
        Ok(())
    }

    async fn add_chain(&self, network: &NetworkConfig) -> Result<(), ProviderError> {
        self.log(format!("wallet_addEthereumChain {}", network.chain_id_hex()));
        if let Some(err) = self.add_error.lock().unwrap().clone() {
            return Err(err);
        }
        self.known_chains.lock().unwrap().insert(network.chain_id);
        Ok(())
    }

    async fn sign_message(&self, address: &str, message: &str) -> Result<String, ProviderError> {
        self.log(format!("personal_sign {address} {message}"));
        self.signature.lock().unwrap().clone()
    }

    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent> {
        self.events.subscribe()
    }
}

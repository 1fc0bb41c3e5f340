//! Marketdesk administration console.

#![forbid(unsafe_code)]

mod console_command;
mod console_config;

use std::env;
use std::sync::Arc;

use chrono::Utc;
use marketdesk_application::{
    AdminSession, AreaScreen, FetchFailurePolicy, MessageKey, Notice, Notifier, ResourceScreen,
    RowActions, ScreenOptions, SubscriptionRequestReview, render,
};
use marketdesk_core::{AppError, AppResult, Language, RecordId};
use marketdesk_domain::{
    Admin, Category, Governorate, Plan, Resource, Subscription, SubscriptionRequest,
};
use marketdesk_infrastructure::{
    ADMINS_PATH, AREAS_PATH, CATEGORIES_PATH, FilePreferenceStore, GOVERNORATES_PATH,
    HttpApiClient, HttpResourceGateway, HttpSubscriptionReviewGateway, InMemoryToastQueue,
    PLANS_PATH, SUBSCRIPTIONS_PATH,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::console_command::{ConsoleCommand, ListTarget};
use crate::console_config::ConsoleConfig;

struct Console {
    client: HttpApiClient,
    session: AdminSession,
    toasts: Arc<InMemoryToastQueue>,
    preferences: FilePreferenceStore,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ConsoleConfig::load()?;
    let args: Vec<String> = env::args().skip(1).collect();
    let command = ConsoleCommand::parse(&args)?;

    let http_client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;
    let session = AdminSession::new();
    let preferences = FilePreferenceStore::new(config.preferences_path.clone());
    let language = session
        .start_with_preferences(config.api_token.clone(), config.language, &preferences)
        .await?;

    info!(
        api_base_url = %config.api_base_url,
        language = language.as_str(),
        "marketdesk-console started"
    );

    let console = Console {
        client: HttpApiClient::new(http_client, config.api_base_url.clone(), session.clone()),
        session,
        toasts: Arc::new(InMemoryToastQueue::new(config.toast_ttl)),
        preferences,
    };

    let result = console.run(command).await;
    for notice in console.toasts.drain() {
        println!("[{}] {}", notice.level.as_str(), notice.message);
    }
    console.session.end().await;

    result
}

impl Console {
    fn notifier(&self) -> Arc<dyn Notifier> {
        self.toasts.clone()
    }

    fn screen<R: Resource>(&self, path: &'static str) -> ResourceScreen<R> {
        ResourceScreen::new(
            Arc::new(HttpResourceGateway::new(self.client.clone(), path)),
            self.notifier(),
            self.session.clone(),
            ScreenOptions::default(),
        )
    }

    fn review(&self) -> SubscriptionRequestReview {
        SubscriptionRequestReview::new(
            Arc::new(HttpSubscriptionReviewGateway::new(self.client.clone())),
            self.notifier(),
            self.session.clone(),
            FetchFailurePolicy::default(),
        )
    }

    async fn run(&self, command: ConsoleCommand) -> AppResult<()> {
        match command {
            ConsoleCommand::List { target, search } => {
                let search = search.unwrap_or_default();
                match target {
                    ListTarget::Admins => {
                        self.list::<Admin>(ADMINS_PATH, search, admin_line).await
                    }
                    ListTarget::Categories => {
                        self.list::<Category>(CATEGORIES_PATH, search, category_line)
                            .await
                    }
                    ListTarget::Plans => self.list::<Plan>(PLANS_PATH, search, plan_line).await,
                    ListTarget::Subscriptions => {
                        self.list::<Subscription>(SUBSCRIPTIONS_PATH, search, subscription_line)
                            .await
                    }
                    ListTarget::Requests => self.list_requests(search).await,
                }
            }
            ConsoleCommand::Areas { governorate_id } => self.list_areas(governorate_id).await,
            ConsoleCommand::Approve { id } => {
                let review = self.review();
                review.load().await?;
                let request = review.approve(id).await?;
                println!("{}", request_line(&request));
                Ok(())
            }
            ConsoleCommand::Reject { id, reason } => {
                let review = self.review();
                review.load().await?;
                let request = review.reject(id, Some(reason.as_str())).await?;
                println!("{}", request_line(&request));
                Ok(())
            }
            ConsoleCommand::DeleteCategory { id } => {
                let screen = self.screen::<Category>(CATEGORIES_PATH);
                screen.load().await?;
                screen.delete(id).await?;
                let language = self.session.language().await;
                for category in screen.view().await {
                    println!("{}", category_line(&category, language));
                }
                Ok(())
            }
            ConsoleCommand::Language(language) => {
                self.session
                    .set_language(language, &self.preferences)
                    .await?;
                self.toasts.notify(Notice::info(render(
                    language,
                    MessageKey::LanguageChanged,
                    "",
                )));
                Ok(())
            }
        }
    }

    async fn list<R: Resource>(
        &self,
        path: &'static str,
        search: String,
        line: fn(&R, Language) -> String,
    ) -> AppResult<()> {
        let mut screen = self.screen::<R>(path);
        screen.set_search(search);
        screen.load().await?;

        let language = self.session.language().await;
        for record in screen.view().await {
            println!("{}", line(&record, language));
        }
        screen.close().await;
        Ok(())
    }

    async fn list_requests(&self, search: String) -> AppResult<()> {
        let mut review = self.review();
        review.set_search(search);
        review.load().await?;

        for (request, actions) in review.rows().await {
            let actions = match actions {
                RowActions::Decide(decisions) => decisions
                    .iter()
                    .map(|decision| decision.as_str())
                    .collect::<Vec<_>>()
                    .join("/"),
                RowActions::Settled(label) => label,
            };
            println!("{} [{actions}]", request_line(&request));
        }
        review.close().await;
        Ok(())
    }

    async fn list_areas(&self, governorate_id: RecordId) -> AppResult<()> {
        let mut screen = AreaScreen::new(
            Arc::new(HttpResourceGateway::new(self.client.clone(), AREAS_PATH)),
            Arc::new(HttpResourceGateway::<Governorate>::new(
                self.client.clone(),
                GOVERNORATES_PATH,
            )),
            self.notifier(),
            self.session.clone(),
            ScreenOptions::default(),
        );
        screen.load_governorates().await?;
        screen.select_governorate(governorate_id).await?;

        for row in screen.rows().await {
            println!(
                "#{} {} ({}) {} points",
                row.area.id,
                row.area.name,
                row.governorate.as_deref().unwrap_or("?"),
                row.area.polygon.len()
            );
        }
        screen.close().await;
        Ok(())
    }
}

fn admin_line(admin: &Admin, _language: Language) -> String {
    format!(
        "#{} {} <{}> {} {}{}",
        admin.id,
        admin.name,
        admin.email,
        admin.phone.as_deref().unwrap_or("-"),
        admin.role.as_str(),
        if admin.is_active { "" } else { " (inactive)" }
    )
}

fn category_line(category: &Category, language: Language) -> String {
    let name = if language.is_rtl() && !category.name_ar.is_empty() {
        category.name_ar.as_str()
    } else {
        category.name.as_str()
    };
    format!(
        "#{} {} {}{}",
        category.id,
        name,
        category.icon_or_placeholder(),
        if category.is_active { "" } else { " (inactive)" }
    )
}

fn plan_line(plan: &Plan, _language: Language) -> String {
    format!(
        "#{} {} {:.2}/month up to {} clients{}",
        plan.id,
        plan.name,
        plan.price_per_month,
        plan.max_clients,
        if plan.is_custom { " (custom)" } else { "" }
    )
}

fn subscription_line(subscription: &Subscription, _language: Language) -> String {
    format!(
        "#{} {} on {} {} {}..{} ({} days left)",
        subscription.id,
        subscription.supplier.name,
        subscription.plan.name,
        subscription.status.as_str(),
        subscription.start_date,
        subscription.end_date,
        subscription.days_remaining(Utc::now().date_naive())
    )
}

fn request_line(request: &SubscriptionRequest) -> String {
    let mut line = format!(
        "#{} {} wants {} for {} months: {}",
        request.id,
        request.supplier.name,
        request.plan.name,
        request.months_requested,
        request.status.as_str()
    );
    if let Some(reason) = &request.rejection_reason {
        line.push_str(format!(" ({reason})").as_str());
    }
    line
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

//! 单次运行编排
//!
//! 登录、解析平台、加载兑换记录、获取码列表，交给对账引擎执行后保存记录。
//! 各协作方只在每次运行时查询一次。

use tracing::{debug, info, Instrument};

use crate::config::AppConfig;
use crate::core::provider::{CodeCatalog, PlatformResolver, Redeemer};
use crate::core::reconcile::{ReconcileEngine, Reconciliation};
use crate::core::store::HistoryStore;
use crate::errors::{Result, ShiftError};
use crate::infrastructure::catalog::OrcicornCatalog;
use crate::infrastructure::http::build_http_client;
use crate::infrastructure::session::ApiSession;
use crate::infrastructure::store::{history_key, JsonFileHistoryStore};
use crate::infrastructure::vendor::{ShiftApiClient, SingleCodeCatalog};

use super::output::{Reporter, ReporterObserver};

/// 运行模式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// 兑换目录中的全部码
    AllCodes,
    /// 只兑换指定的一个码（已规范化）
    SingleCode(String),
}

/// 运行结果汇总
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// 是否找到了候选
    pub attempted: bool,
    pub redeemed: usize,
    pub already_redeemed: usize,
    pub failed: usize,
    /// 兑换记录是否已保存
    pub saved: bool,
}

impl RunSummary {
    fn from_reconciliation(result: &Reconciliation, saved: bool) -> Self {
        Self {
            attempted: result.attempted,
            redeemed: result.redeemed_count(),
            already_redeemed: result.already_redeemed_count(),
            failed: result.failed_count(),
            saved,
        }
    }
}

/// 一次运行所需的协作方
pub struct Collaborators<'a> {
    pub catalog: &'a dyn CodeCatalog,
    pub resolver: &'a dyn PlatformResolver,
    pub redeemer: &'a dyn Redeemer,
    pub store: &'a dyn HistoryStore,
}

/// 运行编排器
pub struct Runner<'a> {
    reporter: &'a dyn Reporter,
}

impl<'a> Runner<'a> {
    pub fn new(reporter: &'a dyn Reporter) -> Self {
        Self { reporter }
    }

    /// 在已登录的前提下执行一次兑换
    ///
    /// 协作方失败是致命错误；单个兑换对的失败只会输出提示。
    pub async fn redeem(
        &self,
        mode: &RunMode,
        history_key: &str,
        deps: Collaborators<'_>,
    ) -> Result<RunSummary> {
        self.reporter.start("Getting SHIFT platforms");
        let owned = match deps.resolver.fetch_owned_platforms().await {
            Ok(owned) => owned,
            Err(e) => return Err(self.fail(e, "could not get SHIFT platforms")),
        };
        self.reporter.success();
        debug!(count = owned.len(), "owned platforms resolved");

        self.reporter.start("Getting previously redeemed SHIFT codes");
        let history = match deps.store.load_or_default(history_key).await {
            Ok(history) => history,
            Err(e) => return Err(self.fail(e, "could not load previously redeemed SHIFT codes")),
        };
        self.reporter.success();

        let codes = match mode {
            RunMode::AllCodes => {
                self.reporter.start("Getting new SHIFT codes");
                let codes = match deps.catalog.fetch_codes().await {
                    Ok(codes) => codes,
                    Err(e) => return Err(self.fail(e, "could not get new SHIFT codes")),
                };
                self.reporter.success();
                codes
            }
            RunMode::SingleCode(code) => {
                self.reporter
                    .start(&format!("Checking single SHIFT code \"{}\"", code));
                let codes = match deps.catalog.fetch_codes().await {
                    Ok(codes) => codes,
                    Err(e) => return Err(self.fail(e, "could not check the SHIFT code")),
                };
                if codes.iter().all(|c| !c.is_universal && c.platforms.is_empty()) {
                    self.reporter
                        .failed("no valid platforms available for this code");
                } else {
                    self.reporter.success();
                }
                codes
            }
        };

        let observer = ReporterObserver::new(self.reporter);
        let result = ReconcileEngine::new(deps.redeemer)
            .with_observer(&observer)
            .reconcile(&codes, &owned, history)
            .await;

        if let RunMode::SingleCode(_) = mode {
            for skipped in &result.skipped {
                self.reporter.info(&format!(
                    "The SHIFT code has already been redeemed on {}",
                    skipped.platform
                ));
            }
        }

        if !result.attempted {
            return match mode {
                RunMode::SingleCode(_) if !result.skipped.is_empty() => {
                    Ok(RunSummary::from_reconciliation(&result, false))
                }
                RunMode::SingleCode(_) => Err(ShiftError::RedemptionError(
                    "the SHIFT code could not be redeemed at this time. Try again later".to_string(),
                )),
                RunMode::AllCodes => {
                    self.reporter
                        .info("No new SHIFT codes at this time. Try again later.");
                    Ok(RunSummary::from_reconciliation(&result, false))
                }
            };
        }

        deps.store
            .save(history_key, &result.history)
            .await
            .map_err(|e| e.context("could not backup list of redeemed SHIFT codes"))?;

        let summary = RunSummary::from_reconciliation(&result, true);
        info!(
            redeemed = summary.redeemed,
            already_redeemed = summary.already_redeemed,
            failed = summary.failed,
            "redemption run finished"
        );
        Ok(summary)
    }

    fn fail(&self, err: ShiftError, action: &str) -> ShiftError {
        self.reporter.failed("failed!");
        err.context(action)
    }
}

/// 按配置执行一次完整运行
pub async fn run(config: &AppConfig, reporter: &dyn Reporter) -> Result<RunSummary> {
    config.validate()?;

    let span = tracing::info_span!("run", run_id = %uuid::Uuid::new_v4());
    async move {
        reporter.start("Setting up");
        let setup = build_http_client(config.http_timeout()).and_then(|http| {
            let store = match &config.history_dir {
                Some(dir) => JsonFileHistoryStore::new(dir),
                None => JsonFileHistoryStore::in_user_config_dir()?,
            };
            Ok((http, store))
        });
        let (http, store) = match setup {
            Ok(setup) => setup,
            Err(e) => {
                reporter.failed("failed!");
                return Err(e.context("could not set up"));
            }
        };
        reporter.success_msg("success!");

        reporter.start(&format!("Logging in as '{}'", config.email.trim()));
        let session = match ApiSession::login(
            &http,
            &config.api_base_url,
            config.email.trim(),
            &config.password,
        )
        .await
        {
            Ok(session) => session,
            Err(e) => {
                reporter.failed("failed!");
                return Err(e.context("could not login"));
            }
        };
        reporter.success_msg("success!");

        let client = ShiftApiClient::new(http.clone(), config.api_base_url.clone(), session)
            .with_game_code_name(config.game_code_name.clone());
        let key = history_key(&config.email);
        let runner = Runner::new(reporter);

        match config.single_code() {
            Some(code) => {
                let catalog = SingleCodeCatalog::new(client.clone(), code.clone(), config.allow_inactive);
                let deps = Collaborators {
                    catalog: &catalog,
                    resolver: &client,
                    redeemer: &client,
                    store: &store,
                };
                runner.redeem(&RunMode::SingleCode(code), &key, deps).await
            }
            None => {
                let catalog = OrcicornCatalog::new(http, config.catalog_url.clone());
                let deps = Collaborators {
                    catalog: &catalog,
                    resolver: &client,
                    redeemer: &client,
                    store: &store,
                };
                runner.redeem(&RunMode::AllCodes, &key, deps).await
            }
        }
    }
    .instrument(span)
    .await
}

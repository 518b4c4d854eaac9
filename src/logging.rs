// ==========================================
// Inicialização do sistema de log
// ==========================================
// tracing + tracing-subscriber, nível configurável por
// variável de ambiente.
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// Inicializa o sistema de log.
///
/// # Variáveis de ambiente
/// - RUST_LOG: filtro de nível (default: info)
///   Ex.: RUST_LOG=debug ou RUST_LOG=prenota_engine=trace
///
/// # Exemplo
/// ```no_run
/// use prenota_engine::logging;
/// logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// Inicialização para ambiente de teste (nível detalhado,
/// writer de teste, ignora dupla inicialização).
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

// ==========================================
// Motor de Pré-Nota - Testes da camada API
// ==========================================
// Gate de submissão (nunca submeter com violações),
// descarte do rascunho em sucesso e bloqueio de operação
// por modo.
// ==========================================


use prenota_engine::{
    ApiError, CancelToken, DraftMode, EngineConfig, PreNota, PreNotaApi, Selection,
};
use std::sync::Arc;
use test_helpers::{
    data_teste, documento_exemplo, fornecedor_exemplo, preencher_nota_valida, IdentidadeTeste,
    MockDocumentos, MockFiliais, MockFornecedores, MockSubmissao, RelogioFixo, CHAVE_VALIDA,
};

fn api(submissao: Arc<MockSubmissao>) -> PreNotaApi {
    PreNotaApi::new(
        IdentidadeTeste::nova("ana.souza"),
        Arc::new(RelogioFixo(data_teste())),
        MockDocumentos::com_documento(documento_exemplo()),
        MockFornecedores::com_candidatos(vec![fornecedor_exemplo()]),
        MockFiliais::com_filial("0101"),
        submissao,
        EngineConfig::default(),
    )
}

#[tokio::test]
async fn submeter_recusa_nota_com_violacoes_sem_chamar_o_erp() {
    let submissao = MockSubmissao::aceitando();
    let mut api = api(submissao.clone());

    // Rascunho recém-aberto: vazio, logo inválido
    let erro = api.submeter().await.unwrap_err();
    match erro {
        ApiError::NotaInvalida { violations, .. } => assert!(!violations.is_empty()),
        outro => panic!("esperava NotaInvalida, veio {:?}", outro),
    }
    assert_eq!(submissao.chamadas(), 0);
}

#[tokio::test]
async fn submeter_nota_valida_descarta_o_rascunho() {
    let submissao = MockSubmissao::aceitando();
    let mut api = api(submissao.clone());
    preencher_nota_valida(api.session_mut());

    let protocolo = api.submeter().await.unwrap();
    assert_eq!(protocolo.numero, "000777");
    assert_eq!(submissao.chamadas(), 1);

    // Sessão volta ao rascunho vazio (fim do ciclo de vida)
    let vazia = PreNota::nova("ana.souza", data_teste());
    assert_eq!(api.session().nota(), &vazia);
    assert_eq!(api.session().modo(), DraftMode::Manual);
}

#[tokio::test]
async fn rejeicao_do_erp_preserva_o_rascunho() {
    let submissao = MockSubmissao::rejeitando();
    let mut api = api(submissao.clone());
    preencher_nota_valida(api.session_mut());
    let antes = api.session().nota().clone();

    let erro = api.submeter().await.unwrap_err();
    assert!(matches!(erro, ApiError::Submissao(_)));
    // Sem perda silenciosa: o rascunho segue editável
    assert_eq!(api.session().nota(), &antes);
}

#[tokio::test]
async fn importar_via_api_marca_modo_importado() {
    let mut api = api(MockSubmissao::aceitando());
    let resumo = api.importar(CHAVE_VALIDA, &CancelToken::new()).await.unwrap();
    assert_eq!(resumo.numero, "000123");
    assert_eq!(api.session().modo(), DraftMode::Importado);
}

#[tokio::test]
async fn selecao_de_fornecedor_funciona_no_modo_manual() {
    let api = api(MockSubmissao::aceitando());
    let opcoes = api.opcoes_fornecedor("11222333000144").await.unwrap();
    match opcoes {
        Selection::Multiple(codigos) => assert_eq!(codigos, vec!["F00042".to_string()]),
        Selection::Single(_) => panic!("esperava lista de candidatos"),
    }
}

#[tokio::test]
async fn selecao_de_fornecedor_e_bloqueada_no_modo_importado() {
    let mut api = api(MockSubmissao::aceitando());
    api.importar(CHAVE_VALIDA, &CancelToken::new()).await.unwrap();

    let erro = api.opcoes_fornecedor("11222333000144").await.unwrap_err();
    assert!(matches!(
        erro,
        ApiError::OperacaoBloqueada {
            modo: DraftMode::Importado,
            ..
        }
    ));
}

#[tokio::test]
async fn cnpj_vazio_e_entrada_invalida() {
    let api = api(MockSubmissao::aceitando());
    let erro = api.opcoes_fornecedor("  ").await.unwrap_err();
    assert!(matches!(erro, ApiError::EntradaInvalida(_)));
}

// ==========================================
// Motor de Pré-Nota - Testes do motor de validação
// ==========================================
// Invariantes cruzados (itens × parcelas, fechamento do
// rateio) e checagens de campo, com a ordem de entidades
// preservada no relatório.
// ==========================================


use prenota_engine::{
    Centavos, EngineConfig, ItemPatch, NovoItem, NovoRateio, Parcela, Percentual,
    ValidationEngine,
};
use test_helpers::{data_teste, preencher_nota_valida, sessao};

fn motor() -> ValidationEngine {
    ValidationEngine::new(EngineConfig::default())
}

fn rateio(filial: &str, pontos: f64) -> NovoRateio {
    NovoRateio {
        filial: filial.to_string(),
        centro_custo: "CC10".to_string(),
        valor: Centavos(5_000),
        percentual: Percentual::de_pontos(pontos),
    }
}

#[test]
fn nota_valida_passa_limpa() {
    let mut s = sessao("ana.souza");
    preencher_nota_valida(&mut s);
    let report = motor().validar(s.nota());
    assert!(report.aprovada(), "violações: {:?}", report.violations);
}

#[test]
fn divergencia_itens_parcelas_gera_exatamente_uma_violacao_cruzada() {
    // Itens somando 150.00 com parcela única de 140.00:
    // uma violação cruzada, zero violações de campo.
    let mut s = sessao("ana.souza");
    preencher_nota_valida(&mut s);
    s.set_parcelas(vec![Parcela {
        numero: "001".to_string(),
        vencimento: data_teste(),
        valor: Centavos(14_000),
    }]);

    let report = motor().validar(s.nota());
    assert_eq!(report.violations.len(), 1);
    let v = &report.violations[0];
    assert_eq!(v.path, "parcelas");
    assert!(v.message.contains("140.00"));
    assert!(v.message.contains("150.00"));
}

#[test]
fn rateio_30_30_30_aponta_os_10_pontos_faltantes() {
    let mut s = sessao("ana.souza");
    preencher_nota_valida(&mut s);
    s.add_rateio(rateio("0101", 30.0));
    s.add_rateio(rateio("0102", 30.0));
    s.add_rateio(rateio("0103", 30.0));

    let report = motor().validar(s.nota());
    assert_eq!(report.violations.len(), 1);
    let v = &report.violations[0];
    assert_eq!(v.path, "rateios");
    assert!(v.message.contains("faltam 10.00 pontos"), "msg: {}", v.message);
}

#[test]
fn rateio_fechando_100_passa() {
    let mut s = sessao("ana.souza");
    preencher_nota_valida(&mut s);
    s.add_rateio(rateio("0101", 33.33));
    s.add_rateio(rateio("0102", 33.33));
    s.add_rateio(rateio("0103", 33.34));
    assert!(motor().validar(s.nota()).aprovada());
}

#[test]
fn rateio_vazio_e_tolerado_salvo_configuracao() {
    let mut s = sessao("ana.souza");
    preencher_nota_valida(&mut s);
    assert!(motor().validar(s.nota()).aprovada());

    let exigente = ValidationEngine::new(EngineConfig {
        exigir_rateio: true,
        ..Default::default()
    });
    let report = exigente.validar(s.nota());
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].path, "rateios");
}

#[test]
fn rascunho_vazio_lista_header_antes_de_itens() {
    // Ordem de declaração das entidades: problemas do
    // cabeçalho aparecem antes do estrutural de itens.
    let s = sessao("ana.souza");
    let report = motor().validar(s.nota());
    assert!(!report.aprovada());
    assert!(report.violations[0].path.starts_with("header."));
    assert!(report.violations.iter().any(|v| v.path == "itens"));
}

#[test]
fn violacao_cruzada_entra_na_posicao_da_entidade_dona() {
    // Divergência itens × parcelas junto com um anexo sem
    // arquivo: "parcelas" precisa aparecer antes de
    // "anexos[0].arquivo" no relatório (ordem de declaração
    // das entidades, não ordem de execução das checagens).
    let mut s = sessao("ana.souza");
    preencher_nota_valida(&mut s);
    s.set_parcelas(vec![Parcela {
        numero: "001".to_string(),
        vencimento: data_teste(),
        valor: Centavos(14_000),
    }]);
    s.add_anexo("", None);

    let report = motor().validar(s.nota());
    let paths: Vec<&str> = report.violations.iter().map(|v| v.path.as_str()).collect();
    assert_eq!(paths, vec!["parcelas", "anexos[0].arquivo"]);
}

#[test]
fn total_informado_respeita_tolerancia_de_um_centavo() {
    let mut s = sessao("ana.souza");
    preencher_nota_valida(&mut s);
    // 3 × 33.33 = 99.99 calculado; informado 100.00 cai
    // dentro da tolerância default de 1 centavo.
    s.update_item(
        0,
        ItemPatch {
            quantidade: Some(3.0),
            valor_unitario: Some(Centavos(3_333)),
            total: Some(Centavos(10_000)),
            ..Default::default()
        },
    )
    .unwrap();
    s.set_parcelas(vec![Parcela {
        numero: "001".to_string(),
        vencimento: data_teste(),
        valor: Centavos(10_000),
    }]);
    assert!(motor().validar(s.nota()).aprovada());

    // 2 centavos além do calculado já estoura.
    s.update_item(
        0,
        ItemPatch {
            total: Some(Centavos(10_001)),
            ..Default::default()
        },
    )
    .unwrap();
    let report = motor().validar(s.nota());
    assert!(report
        .violations
        .iter()
        .any(|v| v.path == "itens[0].total"));
}

#[test]
fn buraco_de_sequencial_apos_remocao_e_apontado() {
    let mut s = sessao("ana.souza");
    preencher_nota_valida(&mut s);
    s.add_item(NovoItem {
        produto: "PRD002".to_string(),
        quantidade: 1.0,
        valor_unitario: Centavos(1_000),
        total: Centavos(1_000),
        pedido: None,
    });
    // Remove o primeiro; o editor não renumera e o buraco
    // fica para a validação cobrar.
    s.remove_item(0).unwrap();
    s.set_parcelas(vec![Parcela {
        numero: "001".to_string(),
        vencimento: data_teste(),
        valor: Centavos(1_000),
    }]);

    let report = motor().validar(s.nota());
    assert!(report
        .violations
        .iter()
        .any(|v| v.path == "itens" && v.message.contains("contíguos")));
}

#[test]
fn checagem_cruzada_nao_roda_sobre_entidade_suja() {
    // Quantidade inválida no item: as violações são todas
    // de campo; o confronto itens × parcelas fica mudo até
    // o item ser corrigido (evita ruído em cascata).
    let mut s = sessao("ana.souza");
    preencher_nota_valida(&mut s);
    s.update_item(
        0,
        ItemPatch {
            quantidade: Some(-1.0),
            ..Default::default()
        },
    )
    .unwrap();
    s.set_parcelas(vec![Parcela {
        numero: "001".to_string(),
        vencimento: data_teste(),
        valor: Centavos(999),
    }]);

    let report = motor().validar(s.nota());
    assert!(!report.aprovada());
    assert!(report.violations.iter().all(|v| v.path != "parcelas"));
}

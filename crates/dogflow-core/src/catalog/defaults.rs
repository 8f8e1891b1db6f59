//! Built-in checklist templates loaded on first start and by "restore
//! defaults".

use dogflow_db::models::NewTemplate;

const DEFAULT_TEMPLATES: &[(&str, &[&str])] = &[
    (
        "Abertura – Hot Dog",
        &[
            "Higienização pessoal: lavar mãos, unhas curtas, avental/luvas (POP Higiene Pessoal)",
            "Checagem de gás e exaustão; teste de vazamento com espuma (segurança)",
            "Ligar chapa e banho-maria; pré-aquecer até temperatura operacional",
            "Sanitizar bancadas, pinças, espátulas, facas e tábua (diluição correta do sanitizante)",
            "Conferir validades: pães, salsichas, molhos, bebidas (FIFO/PEPS)",
            "Mise en place: pães cortados, caixas GN com molhos tampadas",
            "Descongelar pães/insumos conforme previsão de vendas (registro de tempo/temperatura)",
            "Checar estoque mínimo do turno (pães, salsichas, guardanapos, embalagens, copos)",
            "Abrir caixa: conferir troco inicial e registrar valor",
            "Briefing rápido da equipe: metas do dia + POPs críticos",
        ],
    ),
    (
        "Operação – Produção & Qualidade",
        &[
            "Controle de temperatura: chapa ≥ 170°C; banho-maria 60–70°C (HACCP PCC)",
            "Cozimento/regeneração de salsichas por batelada; descartar após 2h no aquecimento",
            "Reposição de molhos com etiqueta (data/hora) e tampa; não misturar antigo com novo",
            "Limpeza rápida a cada 30 min: bancadas, alça de geladeira, puxadores e POS",
            "Medição de temperatura de alimentos prontos (≥ 65°C) com termômetro higienizado",
            "Reposição de pães conforme demanda; evitar sobras ao final do turno",
            "Separação de áreas/utensílios crus x prontos (evitar contaminação cruzada)",
            "Registro de vendas fora do sistema (contingência) — lançar no fim do turno",
            "Coleta de feedback dos clientes (anotar itens mais pedidos e reclamações)",
            "Verificar validade/aparência dos perecíveis a cada 2h; descartar suspeitos",
        ],
    ),
    (
        "Operação – Delivery/Embalagem",
        &[
            "Checar integridade das embalagens, selos e sacolas (sem odor/umidade)",
            "Padronizar montagem (peso do hot dog, sequência de ingredientes, foto-modelo)",
            "Separar pedidos múltiplos por cliente; conferência dupla (itens/bebidas/molhos)",
            "Etiquetar pedido com hora de saída, nome do cliente e observações",
            "Despacho: motorista/entregador registrado; manter alimento protegido do calor externo",
        ],
    ),
    (
        "Fechamento – Limpeza & Caixa",
        &[
            "Desligar chapa/gás e fechar registro; aguardar resfriar para limpeza",
            "Descartar restos conforme POP de resíduos (orgânico/reciclável/óleo)",
            "Lavar e sanitizar utensílios, GN, bancadas, coifa e piso (checklist de pontos críticos)",
            "Conferência de caixa: total do sistema x dinheiro/PIX/cartão; lançar sangria",
            "Atualizar estoque mínimo para o dia seguinte; registrar faltas e perdas",
            "Guardar insumos etiquetados (PEPS), tampados e refrigerados",
            "Checklist final da loja (portas, luzes, gás, lixo externo, documentos)",
        ],
    ),
    (
        "POP – Preparação de Molhos",
        &[
            "Higienizar utensílios e recipientes; conferir validade dos ingredientes",
            "Preparar receita padrão (gramas/ml) — fidelidade à ficha técnica",
            "Envasar em bisnagas/recipientes sanitizados; etiquetar com data/hora e validade",
            "Armazenar refrigerado; controlar primeira saída (PEPS)",
            "Registrar lote do molho em planilha para rastreio",
        ],
    ),
    (
        "POP – Higienização de Equipamentos",
        &[
            "Chapa: raspar resíduos após resfriar; aplicar desengordurante; enxaguar e secar",
            "Banho-maria: esvaziar, remover incrustações e sanitizar; enxaguar",
            "Coifa/filtros: desengordurar, lavar, secar; agendar limpeza profunda semanal",
            "Geladeira/freezer: limpeza de prateleiras; checar borrachas e drenagem",
            "Registrar execução (data/hora/responsável) em planilha ou caderno",
            "Descartar resíduos conforme POP de resíduos (orgânico/reciclável/óleo)",
        ],
    ),
];

/// The built-in template set, in display order.
pub fn default_templates() -> Vec<NewTemplate> {
    DEFAULT_TEMPLATES
        .iter()
        .map(|(name, items)| NewTemplate::new(*name, items.iter().copied()))
        .collect()
}

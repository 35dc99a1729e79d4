//! Prompts sent to the text-generation capability.
//!
//! The summary is rendered as compact text, never as raw rows, so the prompt
//! stays bounded regardless of table size.

use crate::format::{format_currency, units};
use crate::traits::generator::GenerationRequest;
use crate::types::summary::{top_n, SalesSummary};

const TOP_PRODUCTS: usize = 10;
const TOP_PRODUCTS_PER_MONTH: usize = 3;
const TOP_GROUPS: usize = 10;
const TOP_REGIONS_PER_MONTH: usize = 5;

/// Formatting rules appended to the full prompt.
pub const FORMATTING_INSTRUCTIONS: &str = r#"INSTRUÇÕES DE FORMATAÇÃO:
- Destaque números importantes com **negrito**
- Use títulos com ## e listas com bullets (•) ou numeração
- Formate valores monetários como R$ X.XXX,XX
- Use meses no formato Janeiro/2024, Fevereiro/2024
- Compare valores quando relevante (X% maior que Y)
- Use emojis com moderação (📊 📈 💰 🏆)
- Responda em no máximo 300 palavras

Responda em português usando EXATAMENTE os dados agregados acima."#;

/// Sampling for the first attempt.
pub fn full_request(summary: &SalesSummary, question: &str) -> GenerationRequest {
    GenerationRequest {
        prompt: full_prompt(summary, question),
        temperature: 0.2,
        max_output_tokens: 2048,
        top_p: Some(0.95),
        top_k: Some(40),
        relax_safety: true,
    }
}

/// Sampling for the single retry after a content-filter rejection.
pub fn reduced_request(summary: &SalesSummary, question: &str) -> GenerationRequest {
    GenerationRequest {
        prompt: reduced_prompt(summary, question),
        temperature: 0.5,
        max_output_tokens: 512,
        top_p: None,
        top_k: None,
        relax_safety: true,
    }
}

/// Full analytical context: totals, months, products, categories, regions.
pub fn full_prompt(summary: &SalesSummary, question: &str) -> String {
    let mut out = String::with_capacity(4096);

    out.push_str(&format!(
        "Você é um analista de vendas. Aqui está o RESUMO COMPLETO de {} registros de vendas:\n\n",
        summary.row_count
    ));

    out.push_str("📈 RESUMO GERAL:\n");
    out.push_str(&format!(
        "- Registros analisados: {}\n",
        summary.record_count
    ));
    out.push_str(&format!(
        "- Receita total: {}\n",
        format_currency(summary.total_revenue)
    ));
    out.push_str(&format!(
        "- Produtos diferentes vendidos: {}\n",
        summary.unique_product_count
    ));
    out.push_str(&format!(
        "- Unidades vendidas: {}\n",
        units(summary.total_quantity)
    ));
    if let (Some(first), Some(last)) = (summary.first_date, summary.last_date) {
        out.push_str(&format!(
            "- Período: {} a {}\n",
            first.format("%d/%m/%Y"),
            last.format("%d/%m/%Y")
        ));
    }

    let months = summary.months();

    out.push_str("\n📊 RECEITA POR MÊS:\n");
    for month in &months {
        out.push_str(&format!(
            "- {}: {} ({} vendas)\n",
            month,
            format_currency(summary.month_revenue(month)),
            summary.month_sales(month)
        ));
    }

    out.push_str(&format!(
        "\n🏆 TOP {} PRODUTOS MAIS VENDIDOS (unidades):\n",
        TOP_PRODUCTS
    ));
    for (product, quantity) in top_n(&summary.quantity_by_product, TOP_PRODUCTS) {
        out.push_str(&format!("- {}: {} unidades\n", product, units(quantity)));
    }

    out.push_str("\n📅 PRODUTOS MAIS VENDIDOS POR MÊS:\n");
    for month in &months {
        let Some(products) = summary.quantity_by_product_and_month.get(month) else {
            continue;
        };
        out.push_str(&format!("{}:\n", month));
        for (product, quantity) in top_n(products, TOP_PRODUCTS_PER_MONTH) {
            out.push_str(&format!("  - {}: {} unidades\n", product, units(quantity)));
        }
    }

    out.push_str("\n📦 VENDAS POR CATEGORIA (unidades e receita):\n");
    for (category, revenue) in top_n(&summary.revenue_by_category, TOP_GROUPS) {
        let quantity = summary
            .quantity_by_category
            .get(&category)
            .copied()
            .unwrap_or_default();
        out.push_str(&format!(
            "- {}: {} unidades | Receita: {}\n",
            category,
            units(quantity),
            format_currency(revenue)
        ));
    }

    out.push_str("\n🗺️ VENDAS POR REGIÃO (unidades e receita):\n");
    for (region, revenue) in top_n(&summary.revenue_by_region, TOP_GROUPS) {
        let quantity = summary
            .quantity_by_region
            .get(&region)
            .copied()
            .unwrap_or_default();
        out.push_str(&format!(
            "- {}: {} unidades | Receita: {}\n",
            region,
            units(quantity),
            format_currency(revenue)
        ));
    }

    out.push_str("\n🌍 RECEITA POR REGIÃO EM CADA MÊS:\n");
    for month in &months {
        let Some(regions) = summary.revenue_by_region_and_month.get(month) else {
            continue;
        };
        let line = top_n(regions, TOP_REGIONS_PER_MONTH)
            .into_iter()
            .map(|(region, revenue)| format!("{} {}", region, format_currency(revenue)))
            .collect::<Vec<_>>()
            .join(" | ");
        out.push_str(&format!("- {}: {}\n", month, line));
    }

    out.push_str(&format!("\n❓ PERGUNTA DO USUÁRIO: {}\n\n", question));
    out.push_str(FORMATTING_INSTRUCTIONS);
    out.push('\n');
    out
}

/// Minimal context for the retry: regions and months only, no product names.
pub fn reduced_prompt(summary: &SalesSummary, question: &str) -> String {
    let mut out = String::with_capacity(1024);
    out.push_str(&format!("Pergunta: {}\n\n", question));

    out.push_str("Receita total por região:\n");
    for (region, revenue) in top_n(&summary.revenue_by_region, TOP_GROUPS) {
        out.push_str(&format!("- {}: {}\n", region, format_currency(revenue)));
    }

    let months = summary.months();

    out.push_str("\nReceita por mês:\n");
    for month in &months {
        out.push_str(&format!(
            "- {}: {}\n",
            month,
            format_currency(summary.month_revenue(month))
        ));
    }

    out.push_str("\nReceita por região e mês:\n");
    for month in &months {
        let Some(regions) = summary.revenue_by_region_and_month.get(month) else {
            continue;
        };
        let cells = top_n(regions, TOP_REGIONS_PER_MONTH)
            .into_iter()
            .map(|(region, revenue)| format!("{}={}", region, format_currency(revenue)))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!("- {}: {}\n", month, cells));
    }

    out.push_str("\nResponda em português. Use negrito (**valor**) para números.\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::aggregate::aggregate;
    use crate::testing::sale;

    fn summary() -> SalesSummary {
        aggregate(&[
            sale("2024-02-10", "Notebook", "Eletrônicos", "Sul", "2", "7000"),
            sale("2024-01-20", "Mouse", "Acessórios", "Norte", "10", "500"),
        ])
    }

    #[test]
    fn full_prompt_carries_sections_and_question() {
        let prompt = full_prompt(&summary(), "qual o melhor mês?");

        assert!(prompt.contains("Receita total: R$ 7.500,00"));
        assert!(prompt.contains("- Janeiro/2024: R$ 500,00 (1 vendas)"));
        assert!(prompt.contains("- Mouse: 10 unidades"));
        assert!(prompt.contains("Sul R$ 7.000,00"));
        assert!(prompt.contains("PERGUNTA DO USUÁRIO: qual o melhor mês?"));
        assert!(prompt.ends_with(&format!("{}\n", FORMATTING_INSTRUCTIONS)));

        // Months are listed chronologically.
        let jan = prompt.find("- Janeiro/2024").unwrap();
        let feb = prompt.find("- Fevereiro/2024").unwrap();
        assert!(jan < feb);
    }

    #[test]
    fn reduced_prompt_omits_products() {
        let prompt = reduced_prompt(&summary(), "e o sul?");

        assert!(prompt.starts_with("Pergunta: e o sul?"));
        assert!(prompt.contains("Fevereiro/2024: Sul=R$ 7.000,00"));
        assert!(!prompt.contains("Notebook"));
    }

    #[test]
    fn reduced_prompt_caps_regions() {
        let rows: Vec<_> = (0..15)
            .map(|i| {
                let region = format!("Região {:02}", i);
                let revenue = ((i + 1) * 100).to_string();
                sale("2024-01-10", "Item", "Geral", &region, "1", &revenue)
            })
            .collect();
        let prompt = reduced_prompt(&aggregate(&rows), "qual região?");

        let (totals, by_month) = prompt.split_once("Receita por região e mês:").unwrap();
        assert_eq!(totals.matches("- Região").count(), TOP_GROUPS);
        assert!(totals.contains("Região 14"));
        assert!(!totals.contains("Região 00"));
        assert_eq!(by_month.matches("Região").count(), TOP_REGIONS_PER_MONTH);
        assert!(by_month.starts_with("\n- Janeiro/2024: Região 14="));
    }

    #[test]
    fn requests_use_distinct_sampling() {
        let full = full_request(&summary(), "q");
        let reduced = reduced_request(&summary(), "q");

        assert_eq!((full.temperature, full.max_output_tokens), (0.2, 2048));
        assert_eq!((full.top_p, full.top_k), (Some(0.95), Some(40)));
        assert_eq!((reduced.temperature, reduced.max_output_tokens), (0.5, 512));
        assert!(full.relax_safety && reduced.relax_safety);
    }
}

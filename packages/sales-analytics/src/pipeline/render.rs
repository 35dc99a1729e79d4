//! Template answers built from the summary alone.
//!
//! Every renderer with data produces a headline naming the leader, the full
//! ranking, and a one-line insight with a derived percentage. Missing data
//! yields an explanatory sentence.

use rust_decimal::Decimal;

use crate::format::{
    format_currency, format_number, format_percent, percent_change, percent_of, units,
};
use crate::pipeline::classify::{Intent, Question};
use crate::types::month::{month_name, MonthKey};
use crate::types::summary::{leader, ranked, saturating_sum, top_n, SalesSummary, Totals};

/// Answer when the row-store holds no rows.
pub const NO_DATA_ANSWER: &str =
    "📭 Ainda não há dados de vendas para analisar. Envie uma planilha e tente novamente.";

const DIVERSITY_TOP: usize = 10;
const PRODUCT_TOP: usize = 3;

pub fn render(intent: &Intent, question: &Question, summary: &SalesSummary) -> String {
    if summary.is_empty() && *intent != Intent::Help {
        return NO_DATA_ANSWER.to_string();
    }

    match intent {
        Intent::CompareTwoMonths { first, second } => compare_two_months(summary, *first, *second),
        Intent::MonthRanking { highlight } => month_ranking(summary, highlight),
        Intent::ProductDiversity => product_diversity(summary),
        Intent::TopProducts { n } => top_products(summary, *n),
        Intent::Region { month } => region(summary, *month),
        Intent::ProductSales { month } => product_sales(summary, *month),
        Intent::Category => category(summary),
        Intent::BestMonth => best_month(summary),
        Intent::TotalRevenue => total_revenue(summary),
        Intent::MonthOverview { month } => month_overview(summary, *month),
        Intent::Help => help(question),
    }
}

fn compare_two_months(summary: &SalesSummary, first: u32, second: u32) -> String {
    let (a, b) = match (summary.latest_month(first), summary.latest_month(second)) {
        (Some(a), Some(b)) => (a, b),
        (None, _) => return month_missing(first),
        (_, None) => return month_missing(second),
    };

    let revenue_a = summary.month_revenue(&a);
    let revenue_b = summary.month_revenue(&b);
    let delta = revenue_b.saturating_sub(revenue_a);

    let mut out = format!("📊 **Comparação: {} x {}**\n\n", a, b);
    for key in [a, b] {
        out.push_str(&format!("### {}\n", key));
        out.push_str(&format!(
            "💰 Receita: **{}**\n",
            format_currency(summary.month_revenue(&key))
        ));
        out.push_str(&format!("🛒 Vendas: **{}**\n", summary.month_sales(&key)));
        out.push_str("🏆 Top 3 produtos:\n");
        push_medal_list(&mut out, &month_products(summary, &key), PRODUCT_TOP);
        out.push('\n');
    }

    out.push_str("---\n\n");
    let direction = if delta > Decimal::ZERO {
        "aumento"
    } else if delta < Decimal::ZERO {
        "queda"
    } else {
        "sem variação"
    };
    let change = match percent_change(revenue_a, revenue_b) {
        _ if delta.is_zero() => direction.to_string(),
        Some(pct) => format!("{} de **{}**", direction, format_percent(pct)),
        None => format!("{}, sem base percentual", direction),
    };
    out.push_str(&format!(
        "📈 **Diferença:** **{}** ({}) de {} para {}\n",
        format_currency(delta.abs()),
        change,
        a,
        b
    ));

    if revenue_a == revenue_b {
        out.push_str("🤝 **Empate:** os dois meses tiveram a mesma receita.\n");
    } else {
        let winner = if revenue_b > revenue_a { b } else { a };
        out.push_str(&format!("🏆 **Vencedor:** {}\n", winner));
    }
    out
}

fn month_ranking(summary: &SalesSummary, highlight: &[u32]) -> String {
    let ranking = ranked(&summary.revenue_by_month);
    let Some((top, top_value)) = ranking.first().copied() else {
        return "📅 Não há vendas com data registrada para comparar meses.".to_string();
    };

    let marked: Vec<MonthKey> = highlight
        .iter()
        .filter_map(|m| summary.latest_month(*m))
        .collect();

    let mut out = format!(
        "📅 **Ranking de meses por receita**\n\nO melhor mês foi **{}** com **{}**\n\n",
        top,
        format_currency(top_value)
    );
    for (i, (key, value)) in ranking.iter().enumerate() {
        let marker = if marked.contains(key) { " 👈" } else { "" };
        out.push_str(&format!(
            "{}. **{}**: {} ({} vendas){}\n",
            i + 1,
            key,
            format_currency(*value),
            summary.month_sales(key),
            marker
        ));
    }

    let dated = summary.dated_revenue();
    out.push('\n');
    for key in &marked {
        if let Some(position) = ranking.iter().position(|(k, _)| k == key) {
            out.push_str(&format!(
                "📍 {} ficou na **{}ª posição**, com **{}** da receita.\n",
                key,
                position + 1,
                format_percent(percent_of(summary.month_revenue(key), dated))
            ));
        }
    }
    for month in highlight {
        if summary.latest_month(*month).is_none() {
            out.push_str(&format!("⚠️ Sem dados para {}.\n", month_name(*month)));
        }
    }
    out.push_str(&format!(
        "💡 {} concentrou **{}** da receita com data.\n",
        top,
        format_percent(percent_of(top_value, dated))
    ));
    out
}

fn product_diversity(summary: &SalesSummary) -> String {
    let count = summary.unique_product_count;
    let mut out = format!(
        "📦 **Diversidade de produtos**\n\nForam vendidos **{} produtos diferentes**, somando **{} unidades**.\n\n",
        count,
        units(summary.total_quantity)
    );

    out.push_str(&format!("### Top {} por quantidade:\n", DIVERSITY_TOP));
    push_units_ranking(&mut out, &top_n(&summary.quantity_by_product, DIVERSITY_TOP));

    if count > 0 {
        let average = summary.total_quantity / Decimal::from(count);
        out.push_str(&format!(
            "\n💡 Média de **{} unidades** por produto.\n",
            format_number(average, 1)
        ));
    }
    if let Some((name, quantity)) = leader(&summary.quantity_by_product) {
        out.push_str(&format!(
            "📈 {} sozinho responde por **{}** do volume.\n",
            name,
            format_percent(percent_of(quantity, summary.total_quantity))
        ));
    }
    out
}

fn top_products(summary: &SalesSummary, n: usize) -> String {
    let top = top_n(&summary.quantity_by_product, n);
    if top.is_empty() {
        return "📦 Nenhum produto vendido no período analisado.".to_string();
    }

    let mut out = format!("🏆 **Top {} produtos mais vendidos**\n\n", top.len());
    push_units_ranking(&mut out, &top);

    let covered = saturating_sum(top.iter().map(|(_, q)| *q));
    out.push_str(&format!(
        "\n💡 Esses {} produtos representam **{}** do volume total vendido.\n",
        top.len(),
        format_percent(percent_of(covered, summary.total_quantity))
    ));
    out
}

fn region(summary: &SalesSummary, month: Option<u32>) -> String {
    let (scope, revenue, quantity) = match month {
        Some(m) => {
            let Some(key) = summary.latest_month(m) else {
                return month_missing(m);
            };
            (
                format!("em **{}**", key),
                summary.revenue_by_region_and_month.get(&key),
                summary.quantity_by_region_and_month.get(&key),
            )
        }
        None => (
            "no período analisado".to_string(),
            Some(&summary.revenue_by_region),
            Some(&summary.quantity_by_region),
        ),
    };

    let Some((top, top_value)) = revenue.and_then(leader) else {
        return format!("🌍 Não há vendas por região {}.", scope);
    };
    let revenue = revenue.cloned().unwrap_or_default();

    let mut out = format!(
        "🌍 A região com mais vendas {} foi **{}** com **{}**\n\n**Ranking:**\n",
        scope,
        top,
        format_currency(top_value)
    );
    push_revenue_ranking(&mut out, &revenue, quantity);

    let region_total = saturating_sum(revenue.values().copied());
    out.push_str(&format!(
        "\n💡 {} respondeu por **{}** da receita {}.\n",
        top,
        format_percent(percent_of(top_value, region_total)),
        scope
    ));
    out
}

fn product_sales(summary: &SalesSummary, month: Option<u32>) -> String {
    let (scope, quantities) = match month {
        Some(m) => {
            let Some(key) = summary.latest_month(m) else {
                return month_missing(m);
            };
            (
                format!("em **{}**", key),
                summary
                    .quantity_by_product_and_month
                    .get(&key)
                    .cloned()
                    .unwrap_or_default(),
            )
        }
        None => (
            "no **período analisado**".to_string(),
            summary.quantity_by_product.clone(),
        ),
    };

    let Some((top, top_quantity)) = leader(&quantities) else {
        return format!("📦 Nenhum produto vendido {}.", scope);
    };

    let mut out = format!(
        "🏆 **Produto mais vendido {}**\n\n**{}** com **{} unidades** vendidas\n\n### Top 3:\n",
        scope,
        top,
        units(top_quantity)
    );
    push_medal_list(&mut out, &quantities, PRODUCT_TOP);

    let scope_total = saturating_sum(quantities.values().copied());
    out.push_str(&format!(
        "\n💡 {} representa **{}** das unidades vendidas {}.\n",
        top,
        format_percent(percent_of(top_quantity, scope_total)),
        scope
    ));
    out
}

fn category(summary: &SalesSummary) -> String {
    let Some((top, top_value)) = leader(&summary.revenue_by_category) else {
        return "🎯 Não há vendas por categoria.".to_string();
    };

    let mut out = format!(
        "🎯 A categoria com maior receita foi **{}** com **{}**\n\n**Todas as categorias:**\n",
        top,
        format_currency(top_value)
    );
    push_revenue_ranking(
        &mut out,
        &summary.revenue_by_category,
        Some(&summary.quantity_by_category),
    );

    out.push_str(&format!(
        "\n💡 {} concentra **{}** da receita total.\n",
        top,
        format_percent(percent_of(top_value, summary.total_revenue))
    ));
    out
}

fn best_month(summary: &SalesSummary) -> String {
    let ranking = ranked(&summary.revenue_by_month);
    let Some((top, top_value)) = ranking.first().copied() else {
        return "📊 Não há vendas com data registrada para comparar meses.".to_string();
    };

    let mut out = format!(
        "📊 O mês com maior receita foi **{}** com **{}**\n\n**Receita por mês:**\n",
        top,
        format_currency(top_value)
    );
    for (i, (key, value)) in ranking.iter().enumerate() {
        out.push_str(&format!(
            "{}. **{}**: {} ({} vendas)\n",
            i + 1,
            key,
            format_currency(*value),
            summary.month_sales(key)
        ));
    }

    out.push_str(&format!(
        "\n💡 {} concentrou **{}** da receita com data.\n",
        top,
        format_percent(percent_of(top_value, summary.dated_revenue()))
    ));
    out
}

fn total_revenue(summary: &SalesSummary) -> String {
    let mut out = format!(
        "💰 A receita total foi de **{}**\n📦 **{} unidades** em **{} vendas**\n",
        format_currency(summary.total_revenue),
        units(summary.total_quantity),
        summary.record_count
    );

    let months = summary.months();
    if months.is_empty() {
        return out;
    }

    out.push_str("\n**Participação por mês:**\n");
    for key in &months {
        let value = summary.month_revenue(key);
        out.push_str(&format!(
            "• {}: {} ({})\n",
            key,
            format_currency(value),
            format_percent(percent_of(value, summary.total_revenue))
        ));
    }

    let average = summary.dated_revenue() / Decimal::from(months.len());
    out.push_str(&format!(
        "\n💡 Média de **{}** por mês.\n",
        format_currency(average)
    ));
    out
}

fn month_overview(summary: &SalesSummary, month: u32) -> String {
    let Some(key) = summary.latest_month(month) else {
        return month_missing(month);
    };

    let revenue = summary.month_revenue(&key);
    let year_revenue = saturating_sum(
        summary
            .revenue_by_month
            .iter()
            .filter(|(k, _)| k.year == key.year)
            .map(|(_, v)| *v),
    );

    let mut out = format!("📅 **Resumo de {}**\n\n", key);
    out.push_str(&format!("💰 Receita: **{}**\n", format_currency(revenue)));
    out.push_str(&format!("🛒 Vendas: **{}**\n", summary.month_sales(&key)));
    out.push_str(&format!(
        "📈 Participação em {}: **{}**\n\n### Top 3 produtos:\n",
        key.year,
        format_percent(percent_of(revenue, year_revenue))
    ));
    push_medal_list(&mut out, &month_products(summary, &key), PRODUCT_TOP);
    out
}

fn help(question: &Question) -> String {
    format!(
        r#"🤔 **Hmm, preciso de mais contexto!**

Recebi sua pergunta: *"{}"*

### 💡 Experimente perguntas como:

🔹 **Por Produto:**
• "Qual produto foi mais vendido em Janeiro?"
• "Quais os top 5 produtos do ano?"
• "Quantos produtos diferentes foram vendidos?"

🔹 **Por Região:**
• "Qual região vendeu mais?"
• "Qual região vendeu mais em Março?"

🔹 **Por Mês:**
• "Qual foi o melhor mês de vendas?"
• "Mostre as vendas de Março"
• "Compare Janeiro e Fevereiro"

🔹 **Por Categoria:**
• "Qual categoria gerou mais receita?"

💬 **Dica:** Seja específico nas perguntas para obter respostas mais precisas!
"#,
        question.text
    )
}

fn month_missing(month: u32) -> String {
    format!(
        "❌ Não há dados de vendas para {} no período analisado.",
        month_name(month)
    )
}

fn month_products(summary: &SalesSummary, key: &MonthKey) -> Totals {
    summary
        .quantity_by_product_and_month
        .get(key)
        .cloned()
        .unwrap_or_default()
}

fn medal(index: usize) -> &'static str {
    match index {
        0 => "🥇",
        1 => "🥈",
        2 => "🥉",
        _ => "•",
    }
}

fn push_medal_list(out: &mut String, quantities: &Totals, n: usize) {
    for (i, (name, quantity)) in top_n(quantities, n).into_iter().enumerate() {
        out.push_str(&format!(
            "{} **{}**: {} unidades\n",
            medal(i),
            name,
            units(quantity)
        ));
    }
}

fn push_units_ranking(out: &mut String, entries: &[(String, Decimal)]) {
    for (i, (name, quantity)) in entries.iter().enumerate() {
        out.push_str(&format!(
            "{}. **{}**: {} unidades\n",
            i + 1,
            name,
            units(*quantity)
        ));
    }
}

fn push_revenue_ranking(out: &mut String, revenue: &Totals, quantity: Option<&Totals>) {
    for (i, (name, value)) in ranked(revenue).into_iter().enumerate() {
        let sold = quantity
            .and_then(|q| q.get(&name))
            .copied()
            .unwrap_or_default();
        out.push_str(&format!(
            "{}. **{}**: {} ({} unidades)\n",
            i + 1,
            name,
            format_currency(value),
            units(sold)
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::aggregate::aggregate;
    use crate::pipeline::classify::classify;
    use crate::testing::sale;

    fn answer(text: &str, summary: &SalesSummary) -> String {
        let question = Question::parse(text);
        render(&classify(&question), &question, summary)
    }

    fn sample() -> SalesSummary {
        aggregate(&[
            sale("2024-01-05", "Notebook", "Eletrônicos", "Sul", "2", "7000"),
            sale("2024-01-06", "Mouse", "Acessórios", "Norte", "10", "500"),
            sale("2024-03-02", "Mouse", "Acessórios", "Sul", "5", "250"),
            sale("2024-03-09", "Monitor", "Eletrônicos", "Norte", "3", "3000"),
        ])
    }

    #[test]
    fn empty_summary_explains_instead_of_panicking() {
        let empty = SalesSummary::default();
        for text in ["qual região vendeu mais?", "top 5", "compare janeiro e março", "e agosto?"] {
            assert_eq!(answer(text, &empty), NO_DATA_ANSWER);
        }
        assert!(answer("bom dia", &empty).contains("Experimente perguntas"));
    }

    #[test]
    fn region_ranking_lists_every_region() {
        let text = answer("qual região vendeu mais?", &sample());
        assert!(text.contains("foi **Sul** com **R$ 7.250,00**"));
        assert!(text.contains("1. **Sul**: R$ 7.250,00 (7 unidades)"));
        assert!(text.contains("2. **Norte**: R$ 3.500,00 (13 unidades)"));
        assert!(text.contains("**67.4%**"));
    }

    #[test]
    fn region_scoped_to_month() {
        let text = answer("qual região vendeu mais em março?", &sample());
        assert!(text.contains("em **Março/2024** foi **Norte** com **R$ 3.000,00**"));
        assert!(!text.contains("R$ 7.000,00"));
    }

    #[test]
    fn missing_month_is_explained() {
        let text = answer("qual o produto mais vendido em julho?", &sample());
        assert_eq!(text, month_missing(7));
    }

    #[test]
    fn product_sales_in_month_uses_medals() {
        let text = answer("qual produto foi mais vendido em janeiro?", &sample());
        assert!(text.contains("**Mouse** com **10 unidades**"));
        assert!(text.contains("🥇 **Mouse**: 10 unidades"));
        assert!(text.contains("🥈 **Notebook**: 2 unidades"));
    }

    #[test]
    fn top_products_share_of_volume() {
        let text = answer("top 2", &sample());
        assert!(text.contains("Top 2 produtos"));
        assert!(text.contains("1. **Mouse**: 15 unidades"));
        // (15 + 3) / 20
        assert!(text.contains("**90.0%** do volume total"));
    }

    #[test]
    fn diversity_reports_count_and_average() {
        let text = answer("quantos produtos diferentes?", &sample());
        assert!(text.contains("**3 produtos diferentes**"));
        assert!(text.contains("**20 unidades**"));
        assert!(text.contains("Média de **6,7 unidades**"));
    }

    #[test]
    fn total_breaks_down_by_month() {
        let text = answer("qual o faturamento total?", &sample());
        assert!(text.contains("**R$ 10.750,00**"));
        assert!(text.contains("• Janeiro/2024: R$ 7.500,00 (69.8%)"));
        assert!(text.contains("• Março/2024: R$ 3.250,00 (30.2%)"));
    }

    #[test]
    fn month_ranking_marks_mentioned_month() {
        let text = answer("compare março com os outros meses", &sample());
        assert!(text.contains("2. **Março/2024**: R$ 3.250,00 (2 vendas) 👈"));
        assert!(text.contains("Março/2024 ficou na **2ª posição**"));
    }

    #[test]
    fn comparison_handles_decline_and_tie() {
        let text = answer("janeiro x março", &sample());
        assert!(text.contains("**R$ 4.250,00** (queda de **-56.7%**)"));
        assert!(text.contains("🏆 **Vencedor:** Janeiro/2024"));

        let tied = aggregate(&[
            sale("2024-01-05", "A", "X", "Sul", "1", "100"),
            sale("2024-02-05", "B", "X", "Sul", "1", "100"),
        ]);
        let text = answer("janeiro e fevereiro", &tied);
        assert!(text.contains("(sem variação)"));
        assert!(text.contains("Empate"));
    }

    #[test]
    fn help_echoes_question() {
        let text = answer("bom dia", &sample());
        assert!(text.contains(r#"*"bom dia"*"#));
    }
}

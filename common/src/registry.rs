//! 業種レジストリ
//!
//! 業種ごとに、分類対象属性・カテゴリ別辞書ファイル・統合設定を定義する。
//! 組み込みプリセットのほか、JSONファイルから読み込める。

use crate::error::{Error, Result};
use crate::normalize::lookup_key;
use crate::ID_COLUMN;
use serde::{Deserialize, Serialize};

/// カテゴリ → 辞書ファイル
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDictionary {
    pub category: String,
    pub file: String,
}

/// 分類設定
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// 分類対象属性（この順に処理）
    pub attributes: Vec<String>,
    /// カテゴリ別辞書
    pub dictionaries: Vec<CategoryDictionary>,
}

impl ClassifierConfig {
    /// カテゴリの辞書ファイル名を取得
    pub fn dictionary_for(&self, category: &str) -> Option<&CategoryDictionary> {
        self.dictionaries
            .iter()
            .find(|d| d.category == category)
            .or_else(|| {
                let key = lookup_key(category);
                self.dictionaries.iter().find(|d| lookup_key(&d.category) == key)
            })
    }

    pub fn categories(&self) -> Vec<&str> {
        self.dictionaries.iter().map(|d| d.category.as_str()).collect()
    }
}

/// 統合（抽出）設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// 元ファイルの識別子列名
    #[serde(default = "default_source_id")]
    pub source_id_column: String,
    /// 統合対象の属性列
    pub attributes: Vec<String>,
}

fn default_source_id() -> String {
    ID_COLUMN.to_string()
}

/// 業種設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryConfig {
    pub name: String,
    #[serde(default)]
    pub classifier: Option<ClassifierConfig>,
    #[serde(default)]
    pub extractor: Option<ExtractorConfig>,
}

/// 業種レジストリ
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Registry {
    pub industries: Vec<IndustryConfig>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn dictionaries(items: &[(&str, &str)]) -> Vec<CategoryDictionary> {
    items
        .iter()
        .map(|(category, file)| CategoryDictionary {
            category: category.to_string(),
            file: file.to_string(),
        })
        .collect()
}

fn industry(
    name: &str,
    classifier_attrs: &[&str],
    files: &[(&str, &str)],
    extractor_attrs: &[&str],
) -> IndustryConfig {
    IndustryConfig {
        name: name.to_string(),
        classifier: Some(ClassifierConfig {
            attributes: strings(classifier_attrs),
            dictionaries: dictionaries(files),
        }),
        extractor: Some(ExtractorConfig {
            source_id_column: ID_COLUMN.to_string(),
            attributes: strings(extractor_attrs),
        }),
    }
}

impl Registry {
    /// JSONファイルから読み込み
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// JSON文字列から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        let registry: Self = serde_json::from_str(json)?;
        Ok(registry)
    }

    pub fn names(&self) -> Vec<&str> {
        self.industries.iter().map(|i| i.name.as_str()).collect()
    }

    /// 業種を検索（完全一致優先、次に大文字小文字・アクセント無視）
    pub fn find(&self, name: &str) -> Option<&IndustryConfig> {
        self.industries.iter().find(|i| i.name == name).or_else(|| {
            let key = lookup_key(name);
            self.industries.iter().find(|i| lookup_key(&i.name) == key)
        })
    }

    /// 業種を取得（見つからなければ設定エラー）
    pub fn industry(&self, name: &str) -> Result<&IndustryConfig> {
        self.find(name).ok_or_else(|| {
            Error::Configuration(format!(
                "業種「{}」は登録されていません（登録済み: {}）",
                name,
                self.names().join(", ")
            ))
        })
    }

    /// 業種の分類設定を取得
    pub fn classifier(&self, name: &str) -> Result<&ClassifierConfig> {
        let industry = self.industry(name)?;
        industry.classifier.as_ref().ok_or_else(|| {
            Error::Configuration(format!("業種「{}」に分類設定がありません", industry.name))
        })
    }

    /// 業種の統合設定を取得
    pub fn extractor(&self, name: &str) -> Result<&ExtractorConfig> {
        let industry = self.industry(name)?;
        industry.extractor.as_ref().ok_or_else(|| {
            Error::Configuration(format!("業種「{}」に統合設定がありません", industry.name))
        })
    }

    /// 業種・カテゴリから辞書ファイル名を取得
    pub fn dictionary(&self, industry: &str, category: &str) -> Result<&CategoryDictionary> {
        let classifier = self.classifier(industry)?;
        classifier.dictionary_for(category).ok_or_else(|| {
            Error::Configuration(format!(
                "カテゴリ「{}」は業種「{}」に登録されていません（登録済み: {}）",
                category,
                industry,
                classifier.categories().join(", ")
            ))
        })
    }

    /// 組み込みプリセット
    pub fn builtin() -> Self {
        Self {
            industries: vec![
                industry(
                    "M.DIAS BRANCO",
                    &[
                        "Categoría SKU", "Familia", "SubFamilia", "Marca", "SubMarca",
                        "Gramatura MDB", "SubCategoria MDB", "CLASSIFICAÇÃO DO ITEM", "Unidade de Medida",
                    ],
                    &[
                        ("Aveia", "dicionario_mdias_aveia.xlsx"),
                        ("Biscoitos", "dicionario_mdias_biscoitos.xlsx"),
                        ("Granola", "dicionario_mdias_granola.xlsx"),
                        ("Massas Instantâneas", "dicionario_mdias_massa_inst.xlsx"),
                        ("Massas Alimentícias", "dicionario_mdias_massas_alim.xlsx"),
                        ("Pão", "dicionario_mdias_pao.xlsx"),
                    ],
                    &[
                        "SubCategoria MDB", "Gramatura MDB", "CLASSIFICAÇÃO DO ITEM",
                        "Marca", "Familia", "SubFamilia", "SubMarca", "Unidade de Medida",
                    ],
                ),
                industry(
                    "ALVOAR / BETANIA",
                    &[
                        "Categoria", "Subcategoria", "Sabor", "Gramatura",
                        "Embalagem", "Marca", "Frio Seco", "Kids", "Linha", "Zero Lactose",
                    ],
                    &[
                        ("Coalhada", "dicionario_alvoar_coalhada.xlsx"),
                        ("Cream Cheese", "dicionario_alvoar_cream_cheese.xlsx"),
                        ("Iogurte", "dicionario_alvoar_iogurte.xlsx"),
                        ("Leite Sabor", "dicionario_alvoar_leite_sabor.xlsx"),
                        ("Queijos", "dicionario_alvoar_queijos.xlsx"),
                    ],
                    &[
                        "Categoria", "Subcategoria", "Sabor", "Gramatura",
                        "Embalagem", "Marca", "Frio Seco", "Kids", "Linha", "Zero Lactose",
                    ],
                ),
                industry(
                    "FROSTY",
                    &["SUBCATEGORIA", "SABOR", "UNIDADE DE MEDIDA", "Restritivos", "AÇÚCAR"],
                    &[
                        ("Sorvete Massa", "dicionario_frosty_sorvete_massa.xlsx"),
                        ("Sorvete Palito", "dicionario_frosty_sorvete_palito.xlsx"),
                        ("Açaí", "dicionario_frosty_acai.xlsx"),
                        ("Polpa de Frutas", "dicionario_frosty_polpa_frutas.xlsx"),
                        ("Gelo Saborizado", "dicionario_frosty_gelo_saborizado.xlsx"),
                    ],
                    &["SUBCATEGORIA", "SABOR", "UNIDADE DE MEDIDA", "Restritivos", "AÇÚCAR"],
                ),
                industry(
                    "AVINE",
                    &["FAMÍLIA DE VENDAS", "COR", "TIPO", "TAMANHO", "BANDEJA", "CONCATENADO", "PERFIL"],
                    &[("Total", "dicionario_avine.xlsx")],
                    &["FAMÍLIA DE VENDAS", "COR", "TIPO", "TAMANHO", "BANDEJA", "CONCATENADO", "PERFIL"],
                ),
                industry(
                    "MINALBA",
                    &[
                        "CATEGORIA", "SUBCATEGORIA", "SEGMENTO", "EMBALAGEM", "INTERVALO EMBALAGEM",
                        "TAMANHO EMBALAGEM", "FORMATO EMBALAGEM", "MARCA MNB", "CODIGO MNB", "Prod Clasif 10",
                    ],
                    &[("Total", "dicionario_minalba.xlsx")],
                    &[
                        "CATEGORIA", "SUBCATEGORIA", "SEGMENTO", "EMBALAGEM", "INTERVALO EMBALAGEM",
                        "TAMANHO EMBALAGEM", "FORMATO EMBALAGEM", "MARCA MNB", "CODIGO MNB", "Prod Clasif 10",
                    ],
                ),
                industry(
                    "SÃO GERALDO (CAJUINA)",
                    &["TIPO", "CONSUMO", "SABOR", "EMBALAGEM", "SEM ACUCAR", "GRAMATURA CSG"],
                    &[("Total", "dicionario_cajuina.xlsx")],
                    &["TIPO", "CONSUMO", "SABOR", "EMBALAGEM", "SEM ACUCAR", "GRAMATURA CSG"],
                ),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_industries() {
        let registry = Registry::builtin();
        assert_eq!(registry.industries.len(), 6);
        let frosty = registry.classifier("FROSTY").unwrap();
        assert_eq!(frosty.attributes.len(), 5);
        assert_eq!(frosty.dictionaries.len(), 5);
    }

    #[test]
    fn test_find_ignores_case_and_accents() {
        let registry = Registry::builtin();
        let found = registry.find("sao geraldo (cajuina)").unwrap();
        assert_eq!(found.name, "SÃO GERALDO (CAJUINA)");
    }

    #[test]
    fn test_dictionary_lookup() {
        let registry = Registry::builtin();
        let dict = registry.dictionary("M.DIAS BRANCO", "massas instantaneas").unwrap();
        assert_eq!(dict.file, "dicionario_mdias_massa_inst.xlsx");
    }

    #[test]
    fn test_unknown_industry_lists_known_names() {
        let registry = Registry::builtin();
        let err = registry.industry("NESTLE").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("NESTLE"));
        assert!(msg.contains("FROSTY"));
    }

    #[test]
    fn test_unknown_category() {
        let registry = Registry::builtin();
        assert!(matches!(
            registry.dictionary("AVINE", "Ovos Caipira"),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_from_json_defaults_source_id() {
        let json = r#"{
            "industries": [
                { "name": "TESTE", "extractor": { "attributes": ["SABOR"] } }
            ]
        }"#;
        let registry = Registry::from_json(json).unwrap();
        let extractor = registry.extractor("TESTE").unwrap();
        assert_eq!(extractor.source_id_column, ID_COLUMN);
        assert!(registry.classifier("TESTE").is_err());
    }
}

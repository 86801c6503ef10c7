//! Contract bindings.
//!
//! Only the functions and events the wrappers use are declared.

use alloy::sol;

sol! {
    #[sol(rpc)]
    contract ISecurityToken {
        function owner() external view returns (address);
        function name() external view returns (string);
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
        function granularity() external view returns (uint256);
        function totalSupply() external view returns (uint256);
        function balanceOf(address _owner) external view returns (uint256);
        function checkPermission(address _delegate, address _module, bytes32 _perm) external view returns (bool);
        function getVersion() external view returns (uint8[]);
    }

    #[sol(rpc)]
    contract IModule {
        function securityToken() external view returns (address);
        function factory() external view returns (address);
        function paused() external view returns (bool);
        function getPermissions() external view returns (bytes32[]);
        function pause() external;
        function unpause() external;
        function reclaimERC20(address _tokenContract) external;

        event Pause(address account);
        event Unpause(address account);
    }

    #[sol(rpc)]
    contract ModuleFactory {
        function name() external view returns (bytes32);
        function title() external view returns (string);
        function description() external view returns (string);
        function version() external view returns (string);
        function getTypes() external view returns (uint8[]);
        function getTags() external view returns (bytes32[]);
        function setupCost() external view returns (uint256);
        function setupCostInPoly() external returns (uint256);
        function isCostInPoly() external view returns (bool);
        function owner() external view returns (address);
        function polymathRegistry() external view returns (address);
        function getLowerSTVersionBounds() external view returns (uint8[]);
        function getUpperSTVersionBounds() external view returns (uint8[]);
        function changeSetupCost(uint256 _setupCost) external;
        function changeCostAndType(uint256 _setupCost, bool _isCostInPoly) external;
        function changeTitle(string _title) external;
        function changeDescription(string _description) external;
        function changeName(bytes32 _name) external;
        function changeTags(bytes32[] _tagsData) external;
        function changeSTVersionBounds(string _boundType, uint8[] _newVersion) external;
        function transferOwnership(address _newOwner) external;

        event ChangeSetupCost(uint256 _oldSetupCost, uint256 _newSetupCost);
        event ChangeCostType(bool _isOldCostInPoly, bool _isNewCostInPoly);
        event GenerateModuleFromFactory(
            address _module,
            bytes32 indexed _moduleName,
            address indexed _moduleFactory,
            address _creator,
            uint256 _setupCost,
            uint256 _setupCostInPoly
        );
        event ChangeSTVersionBound(string _boundType, uint8 _major, uint8 _minor, uint8 _patch);
        event OwnershipTransferred(address indexed previousOwner, address indexed newOwner);
    }

    #[sol(rpc)]
    contract ISTO {
        function startTime() external view returns (uint256);
        function endTime() external view returns (uint256);
        function wallet() external view returns (address);
        function investorCount() external view returns (uint256);
        function getTokensSold() external view returns (uint256);
        function getRaised(uint8 _fundRaiseType) external view returns (uint256);
        function fundsRaised(uint8 _fundRaiseType) external view returns (uint256);
        function fundRaiseTypes(uint8 _fundRaiseType) external view returns (bool);
        function allowBeneficialInvestments() external view returns (bool);

        event SetFundRaiseTypes(uint8[] _fundRaiseTypes);
    }

    #[sol(rpc)]
    contract CappedSTO {
        function rate() external view returns (uint256);
        function cap() external view returns (uint256);
        function totalTokensSold() external view returns (uint256);
        function getSTODetails() external view returns (
            uint256 startTime,
            uint256 endTime,
            uint256 cap,
            uint256 rate,
            uint256 fundsRaised,
            uint256 investorCount,
            uint256 totalTokensSold,
            bool isRaisedInPoly
        );
        function buyTokens(address _beneficiary) external payable;
        function buyTokensWithPoly(uint256 _investedPOLY) external;
        function changeAllowBeneficialInvestments(bool _allowBeneficialInvestments) external;

        event TokenPurchase(address indexed purchaser, address indexed beneficiary, uint256 value, uint256 amount);
        event SetAllowBeneficialInvestments(bool _allowed);
    }

    #[sol(rpc)]
    contract USDTieredSTO {
        function tiers(uint256 _tier) external view returns (
            uint256 rate,
            uint256 rateDiscountPoly,
            uint256 tokenTotal,
            uint256 tokensDiscountPoly,
            uint256 mintedTotal,
            uint256 mintedDiscountPoly
        );
        function getNumberOfTiers() external view returns (uint256);
        function currentTier() external view returns (uint256);
        function isOpen() external view returns (bool);
        function capReached() external view returns (bool);
        function isFinalized() external view returns (bool);
        function minimumInvestmentUSD() external view returns (uint256);
        function nonAccreditedLimitUSD() external view returns (uint256);
        function investorInvestedUSD(address _investor) external view returns (uint256);
        function getTokensMinted() external view returns (uint256);
        function getTokensSoldFor(uint8 _fundRaiseType) external view returns (uint256);
        function getTokensMintedByTier(uint256 _tier) external view returns (uint256[]);
        function getRate(uint8 _fundRaiseType) external returns (uint256);
        function convertToUSD(uint8 _fundRaiseType, uint256 _amount) external returns (uint256);
        function convertFromUSD(uint8 _fundRaiseType, uint256 _amount) external returns (uint256);
        function treasuryWallet() external view returns (address);
        function getUsdTokens() external view returns (address[]);
        function getAccreditedData() external view returns (
            address[] investors,
            bool[] accredited,
            uint256[] overrides
        );
        function changeAllowBeneficialInvestments(bool _allowBeneficialInvestments) external;
        function changeNonAccreditedLimit(address[] _investors, uint256[] _nonAccreditedLimit) external;
        function modifyTimes(uint256 _startTime, uint256 _endTime) external;
        function modifyLimits(uint256 _nonAccreditedLimitUSD, uint256 _minimumInvestmentUSD) external;
        function modifyFunding(uint8[] _fundRaiseTypes) external;
        function modifyAddresses(address _wallet, address _treasuryWallet, address[] _usdTokens) external;
        function modifyTiers(
            uint256[] _ratePerTier,
            uint256[] _ratePerTierDiscountPoly,
            uint256[] _tokensPerTierTotal,
            uint256[] _tokensPerTierDiscountPoly
        ) external;
        function finalize() external;
        function buyWithETH(address _beneficiary) external payable;
        function buyWithPOLY(address _beneficiary, uint256 _investedPOLY) external;
        function buyWithUSD(address _beneficiary, uint256 _investedSC, address _usdToken) external;

        event SetAllowBeneficialInvestments(bool _allowed);
        event SetNonAccreditedLimit(address _investor, uint256 _limit);
        event TokenPurchase(
            address indexed _purchaser,
            address indexed _beneficiary,
            uint256 _tokens,
            uint256 _usdAmount,
            uint256 _tierPrice,
            uint256 _tier
        );
        event FundsReceived(
            address indexed _purchaser,
            address indexed _beneficiary,
            uint256 _usdAmount,
            uint8 _fundRaiseType,
            uint256 _receivedValue,
            uint256 _spentValue,
            uint256 _rate
        );
        event SetTimes(uint256 _startTime, uint256 _endTime);
        event SetLimits(uint256 _nonAccreditedLimitUSD, uint256 _minimumInvestmentUSD);
        event SetAddresses(address indexed _wallet, address[] _usdTokens);
        event SetTiers(
            uint256[] _ratePerTier,
            uint256[] _ratePerTierDiscountPoly,
            uint256[] _tokensPerTierTotal,
            uint256[] _tokensPerTierDiscountPoly
        );
    }

    /// Additions of the 3.1.0 tiered STO.
    #[sol(rpc)]
    contract USDTieredSTO_3_1_0 {
        function customOracles(uint8 _fundRaiseType) external view returns (address);
        function denominatedCurrency() external view returns (bytes32);
        function modifyOracle(uint8 _fundRaiseType, address _oracleAddress) external;
        function modifyDenominatedCurrency(bytes32 _denominatedCurrency) external;
    }

    #[sol(rpc)]
    contract GeneralTransferManager {
        function issuanceAddress() external view returns (address);
        function defaults() external view returns (uint64 canSendAfter, uint64 canReceiveAfter);
        function nonceMap(address _signer, uint256 _nonce) external view returns (bool);
        function getAllInvestors() external view returns (address[]);
        function getInvestors(uint256 _fromIndex, uint256 _toIndex) external view returns (address[]);
        function getAllInvestorFlags() external view returns (address[] investors, uint256[] flags);
        function getInvestorFlag(address _investor, uint8 _flag) external view returns (bool);
        function getInvestorFlags(address _investor) external view returns (uint256);
        function getAllKYCData() external view returns (
            address[] investors,
            uint256[] canSendAfters,
            uint256[] canReceiveAfters,
            uint256[] expiryTimes
        );
        function getKYCData(address[] _investors) external view returns (
            uint256[] canSendAfters,
            uint256[] canReceiveAfters,
            uint256[] expiryTimes
        );
        function transferRequirements(uint8 _transferType) external view returns (
            bool fromValidKYC,
            bool toValidKYC,
            bool fromRestricted,
            bool toRestricted
        );
        function changeDefaults(uint64 _defaultCanSendAfter, uint64 _defaultCanReceiveAfter) external;
        function changeIssuanceAddress(address _issuanceAddress) external;
        function modifyKYCData(address _investor, uint64 _canSendAfter, uint64 _canReceiveAfter, uint64 _expiryTime) external;
        function modifyKYCDataMulti(
            address[] _investors,
            uint64[] _canSendAfter,
            uint64[] _canReceiveAfter,
            uint64[] _expiryTime
        ) external;
        function modifyInvestorFlag(address _investor, uint8 _flag, bool _value) external;
        function modifyInvestorFlagMulti(address[] _investors, uint8[] _flag, bool[] _value) external;
        function modifyTransferRequirements(
            uint8 _transferType,
            bool _fromValidKYC,
            bool _toValidKYC,
            bool _fromRestricted,
            bool _toRestricted
        ) external;
        function modifyTransferRequirementsMulti(
            uint8[] _transferTypes,
            bool[] _fromValidKYC,
            bool[] _toValidKYC,
            bool[] _fromRestricted,
            bool[] _toRestricted
        ) external;

        event ChangeIssuanceAddress(address _issuanceAddress);
        event ChangeDefaults(uint64 _defaultCanSendAfter, uint64 _defaultCanReceiveAfter);
        event ModifyKYCData(
            address indexed _investor,
            address indexed _addedBy,
            uint64 _canSendAfter,
            uint64 _canReceiveAfter,
            uint64 _expiryTime
        );
        event ModifyInvestorFlag(address indexed _investor, uint8 indexed _flag, bool _value);
        event ModifyTransferRequirements(
            uint8 _transferType,
            bool _fromValidKYC,
            bool _toValidKYC,
            bool _fromRestricted,
            bool _toRestricted
        );
    }

    #[sol(rpc)]
    contract VolumeRestrictionTM {
        function getIndividualRestriction(address _investor) external view returns (
            uint256 allowedTokens,
            uint256 startTime,
            uint256 rollingPeriodInDays,
            uint256 endTime,
            uint8 restrictionType
        );
        function getIndividualDailyRestriction(address _investor) external view returns (
            uint256 allowedTokens,
            uint256 startTime,
            uint256 rollingPeriodInDays,
            uint256 endTime,
            uint8 restrictionType
        );
        function getDefaultRestriction() external view returns (
            uint256 allowedTokens,
            uint256 startTime,
            uint256 rollingPeriodInDays,
            uint256 endTime,
            uint8 restrictionType
        );
        function getDefaultDailyRestriction() external view returns (
            uint256 allowedTokens,
            uint256 startTime,
            uint256 rollingPeriodInDays,
            uint256 endTime,
            uint8 restrictionType
        );
        function getExemptAddress() external view returns (address[]);
        function getRestrictionData() external view returns (
            address[] allAddresses,
            uint256[] allowedTokens,
            uint256[] startTime,
            uint256[] rollingPeriodInDays,
            uint256[] endTime,
            uint8[] typeOfRestriction
        );
        function getIndividualBucketDetailsToUser(address _user) external view returns (
            uint256 lastTradedDayTime,
            uint256 sumOfLastPeriod,
            uint256 daysCovered,
            uint256 dailyLastTradedDayTime,
            uint256 lastTradedTimestamp
        );
        function getDefaultBucketDetailsToUser(address _user) external view returns (
            uint256 lastTradedDayTime,
            uint256 sumOfLastPeriod,
            uint256 daysCovered,
            uint256 dailyLastTradedDayTime,
            uint256 lastTradedTimestamp
        );
        function getTotalTradedByUser(address _user, uint256 _at) external view returns (uint256);
        function changeExemptWalletList(address _wallet, bool _exempted) external;
        function addIndividualRestriction(
            address _holder,
            uint256 _allowedTokens,
            uint256 _startTime,
            uint256 _rollingPeriodInDays,
            uint256 _endTime,
            uint8 _restrictionType
        ) external;
        function addIndividualRestrictionMulti(
            address[] _holders,
            uint256[] _allowedTokens,
            uint256[] _startTimes,
            uint256[] _rollingPeriodInDays,
            uint256[] _endTimes,
            uint8[] _restrictionTypes
        ) external;
        function addIndividualDailyRestriction(
            address _holder,
            uint256 _allowedTokens,
            uint256 _startTime,
            uint256 _endTime,
            uint8 _restrictionType
        ) external;
        function addIndividualDailyRestrictionMulti(
            address[] _holders,
            uint256[] _allowedTokens,
            uint256[] _startTimes,
            uint256[] _endTimes,
            uint8[] _restrictionTypes
        ) external;
        function addDefaultRestriction(
            uint256 _allowedTokens,
            uint256 _startTime,
            uint256 _rollingPeriodInDays,
            uint256 _endTime,
            uint8 _restrictionType
        ) external;
        function addDefaultDailyRestriction(
            uint256 _allowedTokens,
            uint256 _startTime,
            uint256 _endTime,
            uint8 _restrictionType
        ) external;
        function modifyIndividualRestriction(
            address _holder,
            uint256 _allowedTokens,
            uint256 _startTime,
            uint256 _rollingPeriodInDays,
            uint256 _endTime,
            uint8 _restrictionType
        ) external;
        function modifyIndividualRestrictionMulti(
            address[] _holders,
            uint256[] _allowedTokens,
            uint256[] _startTimes,
            uint256[] _rollingPeriodInDays,
            uint256[] _endTimes,
            uint8[] _restrictionTypes
        ) external;
        function modifyIndividualDailyRestriction(
            address _holder,
            uint256 _allowedTokens,
            uint256 _startTime,
            uint256 _endTime,
            uint8 _restrictionType
        ) external;
        function modifyIndividualDailyRestrictionMulti(
            address[] _holders,
            uint256[] _allowedTokens,
            uint256[] _startTimes,
            uint256[] _endTimes,
            uint8[] _restrictionTypes
        ) external;
        function modifyDefaultRestriction(
            uint256 _allowedTokens,
            uint256 _startTime,
            uint256 _rollingPeriodInDays,
            uint256 _endTime,
            uint8 _restrictionType
        ) external;
        function modifyDefaultDailyRestriction(
            uint256 _allowedTokens,
            uint256 _startTime,
            uint256 _endTime,
            uint8 _restrictionType
        ) external;
        function removeIndividualRestriction(address _holder) external;
        function removeIndividualRestrictionMulti(address[] _holders) external;
        function removeIndividualDailyRestriction(address _holder) external;
        function removeIndividualDailyRestrictionMulti(address[] _holders) external;
        function removeDefaultRestriction() external;
        function removeDefaultDailyRestriction() external;

        event ChangedExemptWalletList(address indexed _wallet, bool _exempted);
        event AddIndividualRestriction(
            address indexed _holder,
            uint256 _allowedTokens,
            uint256 _startTime,
            uint256 _rollingPeriodInDays,
            uint256 _endTime,
            uint8 _typeOfRestriction
        );
        event AddIndividualDailyRestriction(
            address indexed _holder,
            uint256 _allowedTokens,
            uint256 _startTime,
            uint256 _rollingPeriodInDays,
            uint256 _endTime,
            uint8 _typeOfRestriction
        );
        event ModifyIndividualRestriction(
            address indexed _holder,
            uint256 _allowedTokens,
            uint256 _startTime,
            uint256 _rollingPeriodInDays,
            uint256 _endTime,
            uint8 _typeOfRestriction
        );
        event ModifyIndividualDailyRestriction(
            address indexed _holder,
            uint256 _allowedTokens,
            uint256 _startTime,
            uint256 _rollingPeriodInDays,
            uint256 _endTime,
            uint8 _typeOfRestriction
        );
        event AddDefaultRestriction(
            uint256 _allowedTokens,
            uint256 _startTime,
            uint256 _rollingPeriodInDays,
            uint256 _endTime,
            uint8 _typeOfRestriction
        );
        event AddDefaultDailyRestriction(
            uint256 _allowedTokens,
            uint256 _startTime,
            uint256 _rollingPeriodInDays,
            uint256 _endTime,
            uint8 _typeOfRestriction
        );
        event ModifyDefaultRestriction(
            uint256 _allowedTokens,
            uint256 _startTime,
            uint256 _rollingPeriodInDays,
            uint256 _endTime,
            uint8 _typeOfRestriction
        );
        event ModifyDefaultDailyRestriction(
            uint256 _allowedTokens,
            uint256 _startTime,
            uint256 _rollingPeriodInDays,
            uint256 _endTime,
            uint8 _typeOfRestriction
        );
        event IndividualRestrictionRemoved(address indexed _holder);
        event IndividualDailyRestrictionRemoved(address indexed _holder);
        event DefaultRestrictionRemoved();
        event DefaultDailyRestrictionRemoved();
    }

    #[sol(rpc)]
    contract VestingEscrowWallet {
        function treasuryWallet() external view returns (address);
        function unassignedTokens() external view returns (uint256);
        function beneficiaries(uint256 _index) external view returns (address);
        function getAllBeneficiaries() external view returns (address[]);
        function getAvailableTokens(address _beneficiary) external view returns (uint256);
        function getAllTemplateNames() external view returns (bytes32[]);
        function getAllTemplates() external view returns (
            bytes32[] names,
            uint256[] numberOfTokens,
            uint256[] duration,
            uint256[] frequency
        );
        function getTemplateCount() external view returns (uint256);
        function getSchedule(address _beneficiary, bytes32 _templateName) external view returns (
            uint256 numberOfTokens,
            uint256 duration,
            uint256 frequency,
            uint256 startTime,
            uint256 claimedTokens,
            uint8 state
        );
        function getTemplateNames(address _beneficiary) external view returns (bytes32[]);
        function getScheduleCount(address _beneficiary) external view returns (uint256);
        function changeTreasuryWallet(address _newTreasuryWallet) external;
        function depositTokens(uint256 _numberOfTokens) external;
        function sendToTreasury(uint256 _amount) external;
        function pushAvailableTokens(address _beneficiary) external;
        function pullAvailableTokens() external;
        function addTemplate(bytes32 _name, uint256 _numberOfTokens, uint256 _duration, uint256 _frequency) external;
        function removeTemplate(bytes32 _name) external;
        function addSchedule(
            address _beneficiary,
            bytes32 _templateName,
            uint256 _numberOfTokens,
            uint256 _duration,
            uint256 _frequency,
            uint256 _startTime
        ) external;
        function addScheduleFromTemplate(address _beneficiary, bytes32 _templateName, uint256 _startTime) external;
        function modifySchedule(address _beneficiary, bytes32 _templateName, uint256 _startTime) external;
        function revokeSchedule(address _beneficiary, bytes32 _templateName) external;
        function revokeAllSchedules(address _beneficiary) external;
        function pushAvailableTokensMulti(uint256 _fromIndex, uint256 _toIndex) external;
        function addScheduleMulti(
            address[] _beneficiaries,
            bytes32[] _templateNames,
            uint256[] _numberOfTokens,
            uint256[] _durations,
            uint256[] _frequencies,
            uint256[] _startTimes
        ) external;
        function addScheduleFromTemplateMulti(
            address[] _beneficiaries,
            bytes32[] _templateNames,
            uint256[] _startTimes
        ) external;
        function revokeSchedulesMulti(address[] _beneficiaries) external;
        function modifyScheduleMulti(
            address[] _beneficiaries,
            bytes32[] _templateNames,
            uint256[] _startTimes
        ) external;

        event AddSchedule(address indexed _beneficiary, bytes32 _templateName, uint256 _startTime);
        event ModifySchedule(address indexed _beneficiary, bytes32 _templateName, uint256 _startTime);
        event RevokeAllSchedules(address indexed _beneficiary);
        event RevokeSchedule(address indexed _beneficiary, bytes32 _templateName);
        event DepositTokens(uint256 _numberOfTokens, address _sender);
        event SendToTreasury(uint256 _numberOfTokens, address _sender);
        event SendTokens(address indexed _beneficiary, uint256 _numberOfTokens);
        event AddTemplate(bytes32 _name, uint256 _numberOfTokens, uint256 _duration, uint256 _frequency);
        event RemoveTemplate(bytes32 _name);
        event TreasuryWalletChanged(address _newWallet, address _oldWallet);
    }

    #[sol(rpc, extra_derives(Debug))]
    contract ModuleRegistry {
        function registerModule(address _moduleFactory) external;
        function removeModule(address _moduleFactory) external;
        function verifyModule(address _moduleFactory) external;
        function unverifyModule(address _moduleFactory) external;
        function getFactoryDetails(address _factoryAddress) external view returns (
            bool isVerified,
            address factoryOwner,
            address[] usingTokens
        );
        function getModulesByType(uint8 _moduleType) external view returns (address[]);
        function getAllModulesByType(uint8 _moduleType) external view returns (address[]);
        function getModulesByTypeAndToken(uint8 _moduleType, address _securityToken) external view returns (address[]);
        function getTagsByType(uint8 _moduleType) external view returns (bytes32[] tags, address[] factories);
        function getTagsByTypeAndToken(uint8 _moduleType, address _securityToken) external view returns (
            bytes32[] tags,
            address[] factories
        );
        function isCompatibleModule(address _moduleFactory, address _securityToken) external view returns (bool);
        function reclaimERC20(address _tokenContract) external;
        function pause() external;
        function unpause() external;
        function isPaused() external view returns (bool);
        function owner() external view returns (address);
        function transferOwnership(address _newOwner) external;

        event Pause(address account);
        event Unpause(address account);
        event ModuleUsed(address indexed _moduleFactory, address indexed _securityToken);
        event ModuleRegistered(address indexed _moduleFactory, address indexed _owner);
        event ModuleVerified(address indexed _moduleFactory);
        event ModuleUnverified(address indexed _moduleFactory);
        event ModuleRemoved(address indexed _moduleFactory, address indexed _decisionMaker);
        event OwnershipTransferred(address indexed previousOwner, address indexed newOwner);
    }

    #[sol(rpc)]
    contract SecurityTokenRegistry {
        function registerNewTicker(address _owner, string _ticker) external;
        function transferTickerOwnership(address _newOwner, string _ticker) external;
        function changeExpiryLimit(uint256 _newExpiry) external;
        function getExpiryLimit() external view returns (uint256);
        function getTickerDetails(string _ticker) external view returns (
            address owner,
            uint256 registrationDate,
            uint256 expiryDate,
            string tokenName,
            bool status
        );
        function getSecurityTokenAddress(string _ticker) external view returns (address);
        function getSecurityTokenData(address _securityToken) external view returns (
            string ticker,
            address owner,
            string details,
            uint256 deployedAt
        );
        function getTickersByOwner(address _owner) external view returns (bytes32[]);
        function getTokensByOwner(address _owner) external view returns (address[]);
        function getTokens() external view returns (address[]);
        function isSecurityToken(address _securityToken) external view returns (bool);
        function getTickerRegistrationFee() external view returns (uint256);
        function getSecurityTokenLaunchFee() external view returns (uint256);
        function getFees(bytes32 _feeType) external returns (uint256 usdFee, uint256 polyFee);
        function changeTickerRegistrationFee(uint256 _tickerRegFee) external;
        function changeSecurityTokenLaunchFee(uint256 _stLaunchFee) external;
        function getLatestProtocolVersion() external view returns (uint8[]);
        function generateNewSecurityToken(
            string _name,
            string _ticker,
            string _tokenDetails,
            bool _divisible,
            address _treasuryWallet,
            uint256 _protocolVersion
        ) external;
        function removeTicker(string _ticker) external;
        function pause() external;
        function unpause() external;
        function isPaused() external view returns (bool);
        function owner() external view returns (address);
        function transferOwnership(address _newOwner) external;

        event Pause(address account);
        event Unpause(address account);
        event ChangeExpiryLimit(uint256 _oldExpiry, uint256 _newExpiry);
        event ChangeTickerOwnership(string _ticker, address indexed _oldOwner, address indexed _newOwner);
        event RegisterTicker(
            address indexed _owner,
            string _ticker,
            uint256 indexed _registrationDate,
            uint256 indexed _expiryDate,
            bool _fromAdmin,
            uint256 _registrationFeePoly,
            uint256 _registrationFeeUsd
        );
        event TickerRemoved(string _ticker, address _removedBy);
        event NewSecurityToken(
            string _ticker,
            string _name,
            address indexed _securityTokenAddress,
            address indexed _owner,
            uint256 _addedAt,
            address _registrant,
            bool _fromAdmin,
            uint256 _usdFee,
            uint256 _polyFee,
            uint256 _protocolVersion
        );
        event ChangeTickerRegistrationFee(uint256 _oldFee, uint256 _newFee);
        event ChangeSecurityTokenLaunchFee(uint256 _oldFee, uint256 _newFee);
        event OwnershipTransferred(address indexed previousOwner, address indexed newOwner);
    }
}
